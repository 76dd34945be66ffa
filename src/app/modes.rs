//! Session phase and visibility state types.
//!
//! # State Machine
//!
//! ```text
//! Idle ──locate──▶ Locating ──fix──▶ Located ⇄ RouteActive
//!                     │                 ▲
//!                     └──error+stored───┘ (fallback)
//! ```
//!
//! `Located → Located` on every tracking update; `RouteActive → Located` on
//! clearing the route. A failed fix with no stored location returns to
//! `Idle`, where routing and search bias are unavailable.
//!
//! The phase is derived from session data by
//! [`AppState::phase`](super::AppState::phase) rather than stored.

/// Where the session is in the location/route lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No position known and none requested.
    Idle,

    /// A one-shot fix is outstanding and no position is known yet.
    Locating,

    /// A position is known.
    Located {
        /// The position was restored from storage after a failed fix.
        fallback: bool,
    },

    /// A position, a destination and a route are all present.
    RouteActive,
}

/// Whether the session is in front of the user.
///
/// Tracking is suspended while hidden to conserve the location resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Foreground,
    Background,
}
