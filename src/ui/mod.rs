//! Presentation layer: notifications, terminal rendering and command input.
//!
//! The coordinator talks to the user only through [`Notification`]s. This
//! module defines that contract and the terminal implementation of it used by
//! the binary.
//!
//! # Architecture
//!
//! ```text
//! handle_event → Action::Present(Notification) → PresentationSurface → ANSI Output
//! stdin line   → parse_command → Command::Event → handle_event
//! ```
//!
//! # Modules
//!
//! - [`presentation`]: Notification types and the surface trait
//! - [`renderer`]: Terminal surface and notification rendering
//! - [`input`]: Command-line parsing into events
//! - [`theme`]: Light and dark palettes and ANSI escape sequence generation

pub mod input;
pub mod presentation;
pub mod renderer;
pub mod theme;

pub use input::{parse_command, Command, HELP};
pub use presentation::{Notification, PresentationSurface, Severity};
pub use renderer::{render, TerminalSurface};
pub use theme::Theme;
