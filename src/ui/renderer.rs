//! Terminal rendering of coordinator notifications.
//!
//! This module turns each [`Notification`] into one or more styled text lines
//! and writes them to any [`Write`] sink. It is the presentation surface used
//! by the interactive binary.
//!
//! # Architecture
//!
//! Rendering is split in two steps so output can be tested without a
//! terminal:
//!
//! 1. [`render`] maps a notification to plain or ANSI-styled lines
//! 2. [`TerminalSurface`] writes those lines and tracks the active palette
//!
//! # Example
//!
//! ```rust
//! use wayfinder::ui::{render, Notification, Severity, Theme};
//!
//! let lines = render(&Notification::toast("Route cleared", Severity::Info), &Theme::default(), false);
//! assert_eq!(lines, vec!["i Route cleared".to_string()]);
//! ```

use crate::domain::{format_step_distance, Coordinate};
use crate::ui::presentation::{Notification, PresentationSurface, Severity};
use crate::ui::theme::Theme;
use std::io::Write;

/// Renders `notification` as output lines.
///
/// # Parameters
///
/// * `notification` - What to show
/// * `theme` - Active palette
/// * `styled` - Emit ANSI colour sequences; `false` yields plain text
///
/// # Returns
///
/// Lines without trailing newlines. Empty for notifications with nothing to
/// say, such as an empty result list after a too-short query.
#[must_use]
pub fn render(notification: &Notification, theme: &Theme, styled: bool) -> Vec<String> {
    let paint = |text: &str, color: &str| -> String {
        if styled {
            format!("{}{text}{}", Theme::fg(color), Theme::reset())
        } else {
            text.to_string()
        }
    };
    let heading = |text: &str| -> String {
        if styled {
            format!("{}{}{text}{}", Theme::bold(), Theme::fg(theme.colors.accent), Theme::reset())
        } else {
            text.to_string()
        }
    };
    let dim = |text: &str| paint(text, theme.colors.dim);

    match notification {
        Notification::Toast {
            message, severity, ..
        } => vec![paint(
            &format!("{} {message}", severity_icon(*severity)),
            theme.severity_color(*severity),
        )],
        Notification::Modal { title, body } => {
            let rule = "─".repeat(title.chars().count().max(body.chars().count()).min(60));
            vec![dim(&rule), heading(title), paint(body, theme.colors.text), dim(&rule)]
        }
        Notification::UserMarker {
            location,
            tier,
            fallback,
        } => {
            let suffix = if *fallback { " [last known]" } else { "" };
            vec![paint(
                &format!(
                    "● You are at {} (accuracy {}, ±{:.0} m){suffix}",
                    location.coordinate,
                    tier.label(),
                    location.accuracy_m
                ),
                theme.colors.marker,
            )]
        }
        Notification::DestinationMarker(destination) => vec![paint(
            &format!(
                "⚑ Destination: {} ({})",
                destination.display_name, destination.coordinate
            ),
            theme.colors.accent,
        )],
        Notification::ClearDestination => vec![dim("Destination cleared")],
        Notification::RoutePath(path) => vec![dim(&format!("Route line with {} points", path.len()))],
        Notification::RouteSummary {
            distance,
            duration,
            mode,
        } => vec![heading(&format!("Route by {mode}: {distance}, {duration}"))],
        Notification::TurnList(steps) => steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                paint(
                    &format!(
                        "{:>3}. {} {} ({})",
                        i + 1,
                        step.maneuver.symbol(),
                        step.instruction,
                        format_step_distance(step.distance_m)
                    ),
                    theme.colors.text,
                )
            })
            .collect(),
        Notification::ClearRoute => vec![dim("Route cleared")],
        Notification::SearchResults(results) => results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "{} {} {}",
                    paint(&format!("[{}]", i + 1), theme.colors.accent),
                    paint(&result.display_name, theme.colors.text),
                    dim(&result.raw_address)
                )
            })
            .collect(),
        Notification::NearbyResults { category, places } => {
            let mut lines = vec![heading(&format!("Nearby {category}"))];
            lines.extend(places.iter().map(|nearby| {
                format!(
                    "  {} {}",
                    paint(&nearby.place.display_name, theme.colors.text),
                    dim(&format!("({})", nearby.distance_label))
                )
            }));
            lines
        }
        Notification::Favorites(favorites) => {
            if favorites.is_empty() {
                return vec![dim("No favorites saved")];
            }
            let mut lines = vec![heading("Favorites")];
            lines.extend(favorites.iter().map(|f| entry_line(f.id, &f.name, f.coordinate, &paint, theme)));
            lines
        }
        Notification::Recent(recent) => {
            if recent.is_empty() {
                return vec![dim("No recent searches")];
            }
            let mut lines = vec![heading("Recent")];
            lines.extend(recent.iter().map(|r| entry_line(r.id, &r.name, r.coordinate, &paint, theme)));
            lines
        }
        Notification::CenterMap(center) => vec![dim(&format!("Map centred on {center}"))],
        Notification::Weather(weather) => vec![paint(
            &format!("☁ {:.1}°C, {}", weather.temperature_c, weather.description()),
            theme.colors.info,
        )],
        Notification::Theme(preference) => vec![dim(&format!("Theme: {}", preference.as_str()))],
        Notification::MapLayer(layer) => vec![dim(&format!("Map layer: {layer}"))],
        Notification::TravelMode(mode) => vec![dim(&format!("Travel mode: {mode}"))],
    }
}

fn entry_line(
    id: i64,
    name: &str,
    coordinate: Coordinate,
    paint: &dyn Fn(&str, &str) -> String,
    theme: &Theme,
) -> String {
    format!(
        "  {} {} {}",
        paint(&format!("[{id}]"), theme.colors.accent),
        paint(name, theme.colors.text),
        paint(&format!("({coordinate})"), theme.colors.dim)
    )
}

const fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "i",
        Severity::Success => "✓",
        Severity::Warning => "!",
        Severity::Error => "✗",
    }
}

/// Presentation surface writing to a terminal or any byte sink.
pub struct TerminalSurface<W: Write> {
    out: W,
    theme: Theme,
    styled: bool,
}

impl<W: Write> TerminalSurface<W> {
    #[must_use]
    pub const fn new(out: W, theme: Theme, styled: bool) -> Self {
        Self { out, theme, styled }
    }

    /// Writes a line outside the notification stream (prompts, help text).
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PresentationSurface for TerminalSurface<W> {
    fn present(&mut self, notification: &Notification) {
        if let Notification::Theme(preference) = notification {
            self.theme = Theme::for_preference(*preference);
        }
        for line in render(notification, &self.theme, self.styled) {
            self.line(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Destination, Fix, ManeuverKind, NearbyPlace, Place, PlaceCategory, Step, TravelMode,
        UserLocation,
    };
    use crate::storage::ThemePreference;

    fn plain(notification: &Notification) -> Vec<String> {
        render(notification, &Theme::default(), false)
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn summary_and_turns() {
        assert_eq!(
            plain(&Notification::RouteSummary {
                distance: "1.0 km".into(),
                duration: "2 min".into(),
                mode: TravelMode::Walking,
            }),
            vec!["Route by walking: 1.0 km, 2 min"]
        );
        assert_eq!(
            plain(&Notification::TurnList(vec![Step {
                instruction: "Turn left onto Strand".into(),
                maneuver: ManeuverKind::Turn,
                distance_m: 250.0,
            }])),
            vec!["  1. ↱ Turn left onto Strand (250 m)"]
        );
    }

    #[test]
    fn user_marker_flags_fallback() {
        let location = UserLocation::from_fix(Fix {
            coordinate: coord(51.5, -0.12),
            accuracy_m: 42.0,
        });
        let lines = plain(&Notification::UserMarker {
            location,
            tier: location.accuracy_tier(),
            fallback: true,
        });
        assert_eq!(
            lines,
            vec!["● You are at 51.50000, -0.12000 (accuracy medium, ±42 m) [last known]"]
        );
    }

    #[test]
    fn empty_search_results_render_nothing() {
        assert!(plain(&Notification::SearchResults(vec![])).is_empty());
    }

    #[test]
    fn nearby_lists_distance_labels() {
        let lines = plain(&Notification::NearbyResults {
            category: PlaceCategory::Cafe,
            places: vec![NearbyPlace {
                place: Place {
                    coordinate: coord(51.5, -0.12),
                    display_name: "Monmouth".into(),
                },
                distance_km: 0.35,
                distance_label: "350 m".into(),
            }],
        });
        assert_eq!(lines, vec!["Nearby cafe", "  Monmouth (350 m)"]);
    }

    #[test]
    fn surface_switches_palette_on_theme() {
        let mut surface = TerminalSurface::new(Vec::new(), Theme::default(), true);
        surface.present(&Notification::Theme(ThemePreference::Dark));
        surface.present(&Notification::DestinationMarker(Destination::new(
            coord(1.0, 2.0),
            Some("Home".into()),
        )));
        assert_eq!(surface.theme().preference, ThemePreference::Dark);

        let written = String::from_utf8(surface.into_inner()).unwrap();
        assert!(written.contains(&Theme::fg("#89b4fa")));
        assert!(written.contains("⚑ Destination: Home (1.00000, 2.00000)"));
    }
}
