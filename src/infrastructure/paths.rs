//! Path resolution for the data directory.
//!
//! The data directory holds the preferences file and the log file. It is
//! resolved from, in order: the `data_dir` configuration value, the
//! `WAYFINDER_DATA_DIR` environment variable, `$XDG_DATA_HOME/wayfinder`, and
//! finally `~/.local/share/wayfinder`.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WAYFINDER_DATA_DIR";

/// Preferences file name inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "wayfinder.log";

/// Returns the data directory for the given configured override.
///
/// # Examples
///
/// ```
/// use wayfinder::infrastructure::get_data_dir;
///
/// let dir = get_data_dir(Some("/tmp/wayfinder-demo"));
/// assert_eq!(dir.to_str(), Some("/tmp/wayfinder-demo"));
/// ```
#[must_use]
pub fn get_data_dir(configured: Option<&str>) -> PathBuf {
    resolve_data_dir(configured, |key| std::env::var(key).ok())
}

/// Resolution logic behind [`get_data_dir`], with the environment injected.
pub fn resolve_data_dir(
    configured: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> PathBuf {
    let home = env("HOME").filter(|h| !h.is_empty());

    if let Some(dir) = configured.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_tilde(dir, home.as_deref()));
    }
    if let Some(dir) = env(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_tilde(&dir, home.as_deref()));
    }
    if let Some(xdg) = env("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        return PathBuf::from(xdg).join("wayfinder");
    }
    home.map_or_else(
        || PathBuf::from(".wayfinder"),
        |home| PathBuf::from(home).join(".local").join("share").join("wayfinder"),
    )
}

/// Expands a leading `~` to `home`. Paths are returned unchanged when no home
/// directory is known.
///
/// # Examples
///
/// ```
/// use wayfinder::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/maps", Some("/home/ada")), "/home/ada/maps");
/// assert_eq!(expand_tilde("~", Some("/home/ada")), "/home/ada");
/// assert_eq!(expand_tilde("/absolute/path", Some("/home/ada")), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string(),
        Some(home) if path.starts_with("~/") => path.replacen('~', home, 1),
        _ => path.to_string(),
    }
}
