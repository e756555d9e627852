//! Integration tests for the `proutes` command.
//!
//! Each test writes a configuration file (and sometimes a separate route
//! manifest) into a temporary directory and checks the printed table.

use std::path::{Path, PathBuf};

use routescope_cli::commands::proutes::{run, ProutesArgs};
use routescope_cli::{build_cli, execute};
use routescope_core::Settings;

const APP: &str = r#"
log_level = "error"

[[routes]]
name = "home"
pattern = "/"

[[routes.views]]
callable = { kind = "function", module = "app.views", name = "home" }
request_methods = "GET"

[[routes]]
name = "about"
pattern = "about"

[[routes.views]]
callable = { kind = "function", module = "app.views", name = "about" }
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn args(config: &Path) -> ProutesArgs {
    ProutesArgs {
        config_uri: Some(config.to_path_buf()),
        ..ProutesArgs::default()
    }
}

fn output(args: &ProutesArgs) -> Vec<String> {
    let mut out = Vec::new();
    run(args, &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[test]
fn test_full_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    assert_eq!(
        output(&args(&config)),
        vec![
            "Name     Pattern    View               Method",
            "----     -------    ----               ------",
            "home     /          app.views.home     GET",
            "about    /about     app.views.about    *",
        ]
    );
}

#[test]
fn test_glob_matches_name_or_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut by_pattern = args(&config);
    by_pattern.glob = Some("/ab*".to_string());
    let lines = output(&by_pattern);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("about "));

    let mut by_name = args(&config);
    by_name.glob = Some("h?me".to_string());
    let lines = output(&by_name);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("home "));
}

#[test]
fn test_widths_come_from_kept_rows_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut filtered = args(&config);
    filtered.glob = Some("home".to_string());
    filtered.format = Some("name,view".to_string());
    assert_eq!(
        output(&filtered),
        vec!["Name    View", "----    ----", "home    app.views.home"]
    );
}

#[test]
fn test_glob_without_matches_prints_headers() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut none = args(&config);
    none.glob = Some("admin*".to_string());
    assert_eq!(output(&none).len(), 2);
}

#[test]
fn test_format_setting_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "app.toml",
        &format!("{APP}\n[proutes]\nformat = \"method | name\"\n"),
    );

    let lines = output(&args(&config));
    assert_eq!(lines[0], "Method    Name");
    assert_eq!(lines[2], "GET       home");

    let mut overridden = args(&config);
    overridden.format = Some("pattern".to_string());
    assert_eq!(output(&overridden)[0], "Pattern");
}

#[test]
fn test_invalid_format_aborts_before_printing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut bad = args(&config);
    bad.format = Some("name,predicates".to_string());
    let mut out = Vec::new();
    let err = run(&bad, &mut out).unwrap_err();

    assert_eq!(
        err.to_string(),
        "You provided invalid formats ['predicates']. \
         Available formats are ['name', 'pattern', 'view', 'method']"
    );
    assert_eq!(err.exit_code(), 2);
    assert!(out.is_empty());
}

#[test]
fn test_invalid_format_reported_even_without_routes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", "[proutes]\nformat = \"url\"\n");

    let mut out = Vec::new();
    let err = run(&args(&config), &mut out).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_trailing_comma_in_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut bad = args(&config);
    bad.format = Some("name,".to_string());
    let err = run(&bad, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().starts_with("You provided invalid formats ['']."));
}

#[test]
fn test_blank_format_setting_shows_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "app.toml",
        &format!("{APP}\n[proutes]\nformat = \"  \"\n"),
    );
    assert_eq!(
        output(&args(&config))[0],
        "Name     Pattern    View               Method"
    );
}

#[test]
fn test_no_routes_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", "debug = false\n");
    assert!(output(&args(&config)).is_empty());
}

#[test]
fn test_no_mapper_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "app.toml",
        "[mapper]\nenabled = false\n\n[[routes]]\nname = \"a\"\npattern = \"/a\"\n",
    );
    assert!(output(&args(&config)).is_empty());
}

#[test]
fn test_separate_manifest_with_config_vars() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "routes.json",
        r#"{"routes": [{"name": "%(prefix)s_root", "pattern": "%(prefix)s",
            "views": [{"callable": {"kind": "function", "module": "api.views", "name": "root"},
                       "request_methods": ["GET", "HEAD"]}]}]}"#,
    );
    let config = write(
        dir.path(),
        "app.toml",
        "route_manifest = \"routes.json\"\n\n[proutes]\nformat = \"name,pattern,method\"\n",
    );

    let mut with_vars = args(&config);
    with_vars.config_vars = vec!["prefix=api".to_string()];
    assert_eq!(
        output(&with_vars),
        vec![
            "Name        Pattern    Method",
            "----        -------    ------",
            "api_root    /api       GET,HEAD",
        ]
    );
}

#[test]
fn test_malformed_config_var_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", APP);

    let mut bad = args(&config);
    bad.config_vars = vec!["novalue".to_string()];
    let err = run(&bad, &mut Vec::new()).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&args(&dir.path().join("missing.toml")), &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_duplicate_route_names_fail() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "app.toml",
        "[[routes]]\nname = \"a\"\npattern = \"/a\"\n\n[[routes]]\nname = \"a\"\npattern = \"/b\"\n",
    );
    let err = run(&args(&config), &mut Vec::new()).unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_cli_dispatches_proutes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "app.toml", "");

    let matches = build_cli()
        .try_get_matches_from(["routescope", "proutes", config.to_str().unwrap()])
        .unwrap();
    assert!(execute(&matches, &Settings::default()).await.is_ok());
}

#[tokio::test]
async fn test_cli_reports_missing_config_uri() {
    let matches = build_cli()
        .try_get_matches_from(["routescope", "proutes"])
        .unwrap();
    let err = execute(&matches, &Settings::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "requires a config file argument");
    assert_eq!(err.exit_code(), 2);
}
