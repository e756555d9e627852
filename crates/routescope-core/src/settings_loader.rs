//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML and JSON
//! files, to substitute command-line config variables into the file text,
//! and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Substitute `%(name)s` placeholders with `name=value` config variables.
//! 3. Load from a TOML or JSON file (overriding defaults).
//! 4. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ROUTESCOPE_DEBUG` | `debug` |
//! | `ROUTESCOPE_LOG_LEVEL` | `log_level` |
//! | `ROUTESCOPE_ROUTE_MANIFEST` | `route_manifest` |
//! | `ROUTESCOPE_PROUTES_FORMAT` | `proutes.format` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use routescope_core::settings_loader;
//!
//! let vars = settings_loader::parse_vars(&["http_port=8080".to_string()]).unwrap();
//! let settings = settings_loader::from_file_with_vars("development.toml", &vars).unwrap();
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::RoutescopeError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values. Unknown
/// tables (such as inline `[[routes]]`) are ignored.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RoutescopeError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RoutescopeError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RoutescopeError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RoutescopeError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a file, picking the format from its extension.
///
/// `.json` files are parsed as JSON; everything else is parsed as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn from_file(path: impl AsRef<Path>) -> Result<Settings, RoutescopeError> {
    from_file_with_vars(path, &HashMap::new())
}

/// Loads settings from a file after substituting config variables, then
/// applies environment variable overrides.
///
/// A relative `route_manifest` is resolved against the directory holding
/// the configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn from_file_with_vars(
    path: impl AsRef<Path>,
    vars: &HashMap<String, String>,
) -> Result<Settings, RoutescopeError> {
    let path = path.as_ref();
    let content = read_with_vars(path, vars)?;

    let mut settings = if is_json(path) {
        from_json_str(&content)?
    } else {
        from_toml_str(&content)?
    };

    apply_env_overrides(&mut settings);

    if let Some(manifest) = settings.route_manifest.take() {
        settings.route_manifest = Some(resolve_relative(path, manifest));
    }

    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Reads a file and substitutes `%(name)s` placeholders with `vars`.
///
/// Used for both settings files and route manifests so that the same
/// command-line variables reach either.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_with_vars(
    path: impl AsRef<Path>,
    vars: &HashMap<String, String>,
) -> Result<String, RoutescopeError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        RoutescopeError::ConfigurationError(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    Ok(substitute_vars(&content, vars))
}

/// Parses `name=value` command-line pairs into a variable map.
///
/// # Errors
///
/// Returns [`RoutescopeError::ConfigurationError`] if a pair has no `=`.
pub fn parse_vars(pairs: &[String]) -> Result<HashMap<String, String>, RoutescopeError> {
    let mut vars = HashMap::new();
    for pair in pairs {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            RoutescopeError::ConfigurationError(format!(
                "Variable assignment {pair:?} invalid (no \"=\")"
            ))
        })?;
        vars.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(vars)
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\((\w+)\)s").expect("placeholder regex should be valid"));

/// Replaces every `%(name)s` in `text` with the value bound to `name`.
///
/// Substitution is a single pass over `text`: placeholders appearing inside
/// substituted values are not expanded again. Placeholders without a
/// binding are left as they are.
pub fn substitute_vars(text: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            vars.get(&caps[1])
                .map_or_else(|| caps[0].to_string(), Clone::clone)
        })
        .into_owned()
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `ROUTESCOPE_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `ROUTESCOPE_LOG_LEVEL` -> `log_level`
/// - `ROUTESCOPE_ROUTE_MANIFEST` -> `route_manifest`
/// - `ROUTESCOPE_PROUTES_FORMAT` -> `proutes.format`
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using `lookup` in place of the process environment.
pub fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("ROUTESCOPE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("ROUTESCOPE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("ROUTESCOPE_ROUTE_MANIFEST") {
        settings.route_manifest = Some(PathBuf::from(val));
    }

    if let Some(val) = lookup("ROUTESCOPE_PROUTES_FORMAT") {
        settings.proutes.format = Some(val);
    }
}

// ============================================================
// Helpers
// ============================================================

/// Returns `true` when `path` names a `.json` file (case-insensitive).
pub fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn resolve_relative(config_path: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(target),
        _ => target,
    }
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, RoutescopeError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RoutescopeError::SerializationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        RoutescopeError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "info"

            [proutes]
            format = "name pattern"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.proutes.format.as_deref(), Some("name pattern"));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.proutes.format.is_none());
    }

    #[test]
    fn test_from_toml_str_ignores_inline_routes() {
        let toml = r#"
            [[routes]]
            name = "home"
            pattern = "/"
        "#;
        let settings = from_toml_str(toml).unwrap();
        assert!(settings.route_manifest.is_none());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(from_toml_str("[[invalid toml content").is_err());
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let err = from_toml_str("debug = \"maybe\"").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{"debug": false, "proutes": {"format": "view,method"}}"#;
        let settings = from_json_str(json).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.proutes.format.as_deref(), Some("view,method"));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{invalid json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("settings.json");
        std::fs::write(&json_path, r#"{"proutes": {"format": "view"}}"#).unwrap();
        let toml_path = dir.path().join("settings.ini");
        std::fs::write(&toml_path, "[proutes]\nformat = \"method\"\n").unwrap();

        assert!(is_json(&json_path));
        assert!(!is_json(&toml_path));
        assert!(from_file(&json_path).is_ok());
        assert!(from_file(&toml_path).is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_file("/nonexistent/path/settings.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_with_vars_substitutes_and_resolves_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(
            &path,
            "route_manifest = \"%(manifest)s\"\n[proutes]\nformat = \"name\"\n",
        )
        .unwrap();

        let mut vars = HashMap::new();
        vars.insert("manifest".to_string(), "routes.json".to_string());

        let settings = from_file_with_vars(&path, &vars).unwrap();
        assert_eq!(
            settings.route_manifest.as_deref(),
            Some(dir.path().join("routes.json").as_path())
        );
    }

    #[test]
    fn test_resolve_relative_keeps_absolute() {
        let target = std::env::temp_dir().join("routes.toml");
        let resolved = resolve_relative(Path::new("conf/app.toml"), target.clone());
        assert_eq!(resolved, target);
    }

    #[test]
    fn test_resolve_relative_bare_file_name() {
        let resolved = resolve_relative(Path::new("app.toml"), PathBuf::from("routes.toml"));
        assert_eq!(resolved, PathBuf::from("routes.toml"));
    }

    // ── Config variables ────────────────────────────────────────────

    #[test]
    fn test_parse_vars() {
        let vars = parse_vars(&["a=1".to_string(), "b = two=2".to_string()]).unwrap();
        assert_eq!(vars.get("a").unwrap(), "1");
        assert_eq!(vars.get("b").unwrap(), "two=2");
    }

    #[test]
    fn test_parse_vars_rejects_missing_equals() {
        let err = parse_vars(&["oops".to_string()]).unwrap_err();
        assert!(matches!(err, RoutescopeError::ConfigurationError(_)));
    }

    #[test]
    fn test_substitute_vars_leaves_unknown_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("port".to_string(), "8080".to_string());
        let out = substitute_vars("port=%(port)s host=%(host)s", &vars);
        assert_eq!(out, "port=8080 host=%(host)s");
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        // Fresh maps get fresh hash seeds, so iteration order varies.
        for _ in 0..16 {
            let vars: HashMap<String, String> = [("a", "%(b)s"), ("b", "X")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            assert_eq!(substitute_vars("port=%(a)s", &vars), "port=%(b)s");
            assert_eq!(substitute_vars("%(b)s%(a)s", &vars), "X%(b)s");
        }
    }

    // ── Overrides ───────────────────────────────────────────────────

    #[test]
    fn test_apply_overrides_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("ROUTESCOPE_DEBUG", "no"),
            ("ROUTESCOPE_LOG_LEVEL", "debug"),
            ("ROUTESCOPE_ROUTE_MANIFEST", "/srv/routes.toml"),
            ("ROUTESCOPE_PROUTES_FORMAT", "name,view"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, |key| env.get(key).map(|v| (*v).to_string()));
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.route_manifest, Some(PathBuf::from("/srv/routes.toml")));
        assert_eq!(settings.proutes.format.as_deref(), Some("name,view"));
    }

    #[test]
    fn test_apply_overrides_debug_values() {
        for (raw, expected) in [("true", true), ("1", true), ("YES", true), ("0", false)] {
            let mut settings = Settings::default();
            settings.debug = !expected;
            apply_overrides_from(&mut settings, |key| {
                (key == "ROUTESCOPE_DEBUG").then(|| raw.to_string())
            });
            assert_eq!(settings.debug, expected, "ROUTESCOPE_DEBUG={raw}");
        }
    }

    #[test]
    fn test_apply_overrides_nothing_set() {
        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, no_env);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.proutes.format.is_none());
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}
