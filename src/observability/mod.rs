//! Structured logging with file output.
//!
//! This module sets up `tracing` for the whole crate. Events and spans are
//! formatted as text lines and written to a size-rotated file in the data
//! directory.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → wayfinder.log (+ backups)
//! ```
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` configuration option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
