//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where Wayfinder keeps its files on the host: the
//! preferences store and the rotating log.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, resolve_data_dir, LOG_FILE, PREFERENCES_FILE};
