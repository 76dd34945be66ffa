//! Async worker for service calls, timers and location tracking.
//!
//! This module runs every effect the coordinator asks for on the tokio
//! runtime and feeds the outcomes back as events, keeping the coordinator
//! itself free of I/O.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types keyed by request id
//! - `handler`: Worker implementation and action execution

pub mod handler;
pub mod messages;

pub use handler::{perform, ServiceWorker};
pub use messages::{RequestId, ServiceRequest, ServiceResponse, SubscriptionId};
