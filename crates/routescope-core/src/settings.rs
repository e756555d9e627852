//! Settings for routescope.
//!
//! [`Settings`] holds everything the tool reads from its configuration file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The `[proutes]` section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProutesSettings {
    /// Which columns to display, separated by commas, pipes or whitespace
    /// (e.g. `"name pattern view"`). `None` shows every column.
    pub format: Option<String>,
}

/// The complete set of tool settings.
///
/// # Examples
///
/// ```
/// use routescope_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "warn");
/// assert!(settings.route_manifest.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Controls the log format.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "routescope_routes=trace").
    pub log_level: String,

    // ── Routes ───────────────────────────────────────────────────────

    /// Path of the route manifest exported by the application.
    ///
    /// When unset, the configuration file itself is read as the manifest.
    pub route_manifest: Option<PathBuf>,

    // ── Commands ─────────────────────────────────────────────────────

    /// Settings for the `proutes` command.
    pub proutes: ProutesSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "warn".to_string(),
            route_manifest: None,
            proutes: ProutesSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "warn");
        assert!(s.route_manifest.is_none());
        assert!(s.proutes.format.is_none());
    }

    #[test]
    fn test_settings_roundtrip_through_json_keeps_proutes_section() {
        let mut s = Settings::default();
        s.proutes.format = Some("name view".to_string());
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["proutes"]["format"], "name view");
        let back: Settings = serde_json::from_value(value).unwrap();
        assert_eq!(back.proutes, s.proutes);
    }
}
