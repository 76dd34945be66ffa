//! Line-oriented command parsing for the interactive terminal.
//!
//! Each input line maps to at most one [`Command`]: usually a coordinator
//! [`Event`], occasionally something handled by the binary itself (moving the
//! manual position, help, quit).

use crate::app::{Event, Visibility};
use crate::domain::{Coordinate, Fix, LocationErrorKind, PlaceCategory, TravelMode};
use crate::storage::{EntryId, MapLayer, ThemePreference};

/// Accuracy assumed for a hand-entered position without an explicit radius.
const DEFAULT_MANUAL_ACCURACY_M: f64 = 10.0;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    /// Move the manual geolocation source, then request a fix.
    SetPosition(Fix),
    /// Make the manual geolocation source fail, then request a fix.
    FailPosition(LocationErrorKind),
    Help,
    Quit,
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  locate                     request a fresh position fix
  here LAT,LNG [ACCURACY]    set the manual position and locate
  here off|denied|unsupported  make the position fail and locate
  dest LAT,LNG [NAME]        set the destination
  route                      retry the route to the destination
  clear                      clear route and destination
  mode driving|walking|cycling
  search TEXT                search for places (3+ characters)
  pick N                     choose search result N
  nearby CATEGORY [LAT,LNG]  restaurant, cafe, fuel, hospital, pharmacy, bank
  fav [add [LAT,LNG] | rm ID | go ID]
  recent [go ID | clear]
  map LAT,LNG                pan the map
  center                     centre the map on your position
  theme [light|dark]         set or toggle the theme
  layer streets|satellite|terrain
  bg | fg                    send the session to the background or foreground
  help | quit";

/// Parses one input line.
///
/// # Returns
///
/// - `Ok(None)` for a blank line
/// - `Ok(Some(command))` for a recognised command
///
/// # Errors
///
/// Returns a user-facing message when the command or its arguments are not
/// understood.
///
/// # Example
///
/// ```rust
/// use wayfinder::app::Event;
/// use wayfinder::ui::{parse_command, Command};
///
/// assert_eq!(parse_command("route"), Ok(Some(Command::Event(Event::RetryRoute))));
/// assert!(parse_command("teleport").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
    if verb.is_empty() {
        return Ok(None);
    }

    let event = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" | "q" => return Ok(Some(Command::Quit)),
        "here" => return parse_here(rest).map(Some),
        "locate" => Event::LocateRequested,
        "dest" | "to" => {
            let (coordinate, name) = split_coordinate(rest)?;
            Event::SetDestination {
                coordinate,
                name: (!name.is_empty()).then(|| name.to_string()),
            }
        }
        "route" => Event::RetryRoute,
        "clear" => Event::ClearRoute,
        "mode" => Event::ChangeTravelMode(rest.parse::<TravelMode>()?),
        "search" | "s" => Event::SearchInput(rest.to_string()),
        "pick" => {
            let index: usize = rest
                .parse()
                .map_err(|_| format!("expected a result number, got '{rest}'"))?;
            if index == 0 {
                return Err("result numbers start at 1".to_string());
            }
            Event::PickSearchResult(index - 1)
        }
        "nearby" => {
            let (category, center) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Event::SearchNearby {
                category: category.parse::<PlaceCategory>()?,
                center: optional_coordinate(center)?,
            }
        }
        "fav" | "favorites" => parse_favorite(rest)?,
        "recent" => parse_recent(rest)?,
        "map" => Event::MapMoved(rest.parse::<Coordinate>()?),
        "center" | "centre" => Event::CenterOnUser,
        "theme" => {
            if rest.is_empty() {
                Event::ToggleTheme
            } else {
                Event::SetTheme(rest.parse::<ThemePreference>()?)
            }
        }
        "layer" => Event::SetMapLayer(rest.parse::<MapLayer>()?),
        "bg" => Event::VisibilityChanged(Visibility::Background),
        "fg" => Event::VisibilityChanged(Visibility::Foreground),
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };

    Ok(Some(Command::Event(event)))
}

fn parse_favorite(rest: &str) -> Result<Event, String> {
    let (sub, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match sub {
        "" | "list" => Ok(Event::ShowFavorites),
        "add" => Ok(Event::AddFavorite {
            coordinate: optional_coordinate(arg)?,
        }),
        "rm" | "remove" => Ok(Event::RemoveFavorite(parse_entry_id(arg)?)),
        "go" => Ok(Event::SelectFavorite(parse_entry_id(arg)?)),
        other => Err(format!("unknown favorites command '{other}'")),
    }
}

fn parse_recent(rest: &str) -> Result<Event, String> {
    let (sub, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match sub {
        "" | "list" => Ok(Event::ShowRecent),
        "go" => Ok(Event::SelectRecent(parse_entry_id(arg)?)),
        "clear" => Ok(Event::ClearRecent),
        other => Err(format!("unknown recent command '{other}'")),
    }
}

fn parse_entry_id(arg: &str) -> Result<EntryId, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected an entry id, got '{}'", arg.trim()))
}

fn optional_coordinate(arg: &str) -> Result<Option<Coordinate>, String> {
    let arg = arg.trim();
    if arg.is_empty() {
        Ok(None)
    } else {
        arg.parse().map(Some)
    }
}

/// Splits `"LAT,LNG rest of line"` into the coordinate and the remainder.
fn split_coordinate(rest: &str) -> Result<(Coordinate, &str), String> {
    let (coordinate, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((coordinate.parse()?, tail.trim()))
}

fn parse_here(rest: &str) -> Result<Command, String> {
    let failure = match rest.to_ascii_lowercase().as_str() {
        "off" | "unavailable" => Some(LocationErrorKind::PositionUnavailable),
        "denied" => Some(LocationErrorKind::PermissionDenied),
        "unsupported" => Some(LocationErrorKind::Unsupported),
        _ => None,
    };
    match failure {
        Some(kind) => Ok(Command::FailPosition(kind)),
        None => parse_position(rest).map(Command::SetPosition),
    }
}

fn parse_position(rest: &str) -> Result<Fix, String> {
    let (coordinate, accuracy) = split_coordinate(rest)?;
    let accuracy_m = if accuracy.is_empty() {
        DEFAULT_MANUAL_ACCURACY_M
    } else {
        accuracy
            .trim_end_matches('m')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|m| m.is_finite() && *m >= 0.0)
            .ok_or_else(|| format!("invalid accuracy '{accuracy}'"))?
    };
    Ok(Fix {
        coordinate,
        accuracy_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str) -> Event {
        match parse_command(line) {
            Ok(Some(Command::Event(event))) => event,
            other => panic!("expected event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn destination_with_and_without_name() {
        assert_eq!(
            event("dest 51.5074,-0.1278 Trafalgar Square"),
            Event::SetDestination {
                coordinate: Coordinate::new(51.5074, -0.1278).unwrap(),
                name: Some("Trafalgar Square".into()),
            }
        );
        assert_eq!(
            event("dest 40.7,-74.0"),
            Event::SetDestination {
                coordinate: Coordinate::new(40.7, -74.0).unwrap(),
                name: None,
            }
        );
        assert!(parse_command("dest nowhere").is_err());
    }

    #[test]
    fn search_keeps_full_text() {
        assert_eq!(event("search Central Park"), Event::SearchInput("Central Park".into()));
        assert_eq!(event("search"), Event::SearchInput(String::new()));
    }

    #[test]
    fn pick_is_one_based() {
        assert_eq!(event("pick 2"), Event::PickSearchResult(1));
        assert!(parse_command("pick 0").is_err());
    }

    #[test]
    fn favorites_subcommands() {
        assert_eq!(event("fav"), Event::ShowFavorites);
        assert_eq!(event("fav add"), Event::AddFavorite { coordinate: None });
        assert_eq!(event("fav rm 17"), Event::RemoveFavorite(17));
        assert_eq!(event("fav go 17"), Event::SelectFavorite(17));
        assert!(parse_command("fav rm x").is_err());
    }

    #[test]
    fn nearby_with_optional_center() {
        assert_eq!(
            event("nearby cafe"),
            Event::SearchNearby {
                center: None,
                category: PlaceCategory::Cafe,
            }
        );
        assert_eq!(
            event("nearby Pharmacy 51.5,-0.1"),
            Event::SearchNearby {
                center: Some(Coordinate::new(51.5, -0.1).unwrap()),
                category: PlaceCategory::Pharmacy,
            }
        );
    }

    #[test]
    fn here_sets_manual_position() {
        assert_eq!(
            parse_command("here 51.5,-0.12 35m"),
            Ok(Some(Command::SetPosition(Fix {
                coordinate: Coordinate::new(51.5, -0.12).unwrap(),
                accuracy_m: 35.0,
            })))
        );
        assert!(parse_command("here 51.5,-0.12 -4").is_err());
    }

    #[test]
    fn here_off_variants_fail_the_source() {
        assert_eq!(
            parse_command("here off"),
            Ok(Some(Command::FailPosition(LocationErrorKind::PositionUnavailable)))
        );
        assert_eq!(
            parse_command("here DENIED"),
            Ok(Some(Command::FailPosition(LocationErrorKind::PermissionDenied)))
        );
        assert_eq!(
            parse_command("here unsupported"),
            Ok(Some(Command::FailPosition(LocationErrorKind::Unsupported)))
        );
        assert!(parse_command("here nowhere").is_err());
    }

    #[test]
    fn theme_toggles_without_argument() {
        assert_eq!(event("theme"), Event::ToggleTheme);
        assert_eq!(event("theme dark"), Event::SetTheme(ThemePreference::Dark));
    }

    #[test]
    fn unknown_verb_is_rejected() {
        assert!(parse_command("fly").unwrap_err().contains("unknown command"));
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    }
}
