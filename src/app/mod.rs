//! Application layer coordinating state, events, and actions.
//!
//! This module is the coordinator proper. It sits between the runtime
//! (main.rs, the worker) and the domain/storage layers and turns every user
//! intent or service outcome into state changes plus a list of side effects.
//!
//! # Architecture
//!
//! ```text
//! Intents → Events → Event Handler → State Mutations → Actions → Side Effects
//!                        ↑                                  ↓
//!                        └──────── Service Responses ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing, location and route transitions
//! - [`places`]: Search, nearby discovery, favorites and recent history
//! - [`modes`]: Session phase and visibility types
//! - [`requests`]: Latest-request bookkeeping for stale response discard
//! - [`state`]: Session state container
//!
//! # Example
//!
//! ```rust
//! use wayfinder::app::{handle_event, AppState, Event};
//! use wayfinder::domain::Coordinate;
//! use wayfinder::storage::{MemoryPreferences, Preferences};
//!
//! let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
//! let mut state = AppState::new(prefs, Coordinate::new(51.5074, -0.1278).unwrap());
//! let actions = handle_event(&mut state, &Event::ClearRoute);
//! assert!(actions.is_empty());
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod places;
pub mod requests;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{SessionPhase, Visibility};
pub use places::{FAVORITE_PLACEHOLDER, MIN_QUERY_CHARS, SEARCH_DEBOUNCE};
pub use requests::{Operation, RequestLedger};
pub use state::AppState;
