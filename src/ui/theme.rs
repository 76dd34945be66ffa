//! Palettes and ANSI escape sequence generation.
//!
//! Two built-in palettes back the persisted [`ThemePreference`]: a light one
//! for bright terminals and a dark one. Colours are hex strings converted to
//! 24-bit ANSI sequences on demand.
//!
//! # Example
//!
//! ```rust
//! use wayfinder::storage::ThemePreference;
//! use wayfinder::ui::Theme;
//!
//! let theme = Theme::for_preference(ThemePreference::Dark);
//! print!("{}Route ready{}", Theme::fg(theme.colors.success), Theme::reset());
//! ```

use crate::storage::ThemePreference;
use crate::ui::Severity;

/// Colour scheme used by the terminal surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub preference: ThemePreference,
    pub colors: ThemeColors,
}

/// Hex colours for each kind of output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub text: &'static str,
    pub dim: &'static str,
    pub accent: &'static str,
    pub info: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
    /// User marker and route line.
    pub marker: &'static str,
}

const LIGHT: ThemeColors = ThemeColors {
    text: "#4c4f69",
    dim: "#8c8fa1",
    accent: "#1e66f5",
    info: "#209fb5",
    success: "#40a02b",
    warning: "#df8e1d",
    error: "#d20f39",
    marker: "#8839ef",
};

const DARK: ThemeColors = ThemeColors {
    text: "#cdd6f4",
    dim: "#6c7086",
    accent: "#89b4fa",
    info: "#74c7ec",
    success: "#a6e3a1",
    warning: "#f9e2af",
    error: "#f38ba8",
    marker: "#cba6f7",
};

impl Theme {
    #[must_use]
    pub const fn for_preference(preference: ThemePreference) -> Self {
        let colors = match preference {
            ThemePreference::Light => LIGHT,
            ThemePreference::Dark => DARK,
        };
        Self { preference, colors }
    }

    /// Colour for a toast of `severity`.
    #[must_use]
    pub const fn severity_color(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Info => self.colors.info,
            Severity::Success => self.colors.success,
            Severity::Warning => self.colors.warning,
            Severity::Error => self.colors.error,
        }
    }

    /// Converts a hex colour string to RGB components.
    ///
    /// Malformed components become 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wayfinder::ui::Theme;
    ///
    /// assert_eq!(Theme::hex_to_rgb("#cdd6f4"), (205, 214, 244));
    /// ```
    #[must_use]
    pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#');
        let component = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|part| u8::from_str_radix(part, 16).ok())
                .unwrap_or(0)
        };
        (component(0..2), component(2..4), component(4..6))
    }

    /// ANSI 24-bit foreground sequence, `\x1b[38;2;r;g;bm`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_preference(ThemePreference::default())
    }
}
