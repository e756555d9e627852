//! The `proutes` management command.
//!
//! Prints every route of an application together with the view that
//! answers it and the request methods that reach that view.
//!
//! ```text
//! routescope proutes development.toml
//! routescope proutes development.toml -g '/api/*' -f name,view
//! routescope proutes development.toml http_port=8080
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use routescope_core::logging::setup_logging;
use routescope_core::settings_loader::{from_file_with_vars, parse_vars};
use routescope_core::{RoutescopeError, RoutescopeResult, Settings};
use routescope_routes::{resolve_routes, RouteManifest};

use crate::command::ManagementCommand;
use crate::glob::GlobFilter;
use crate::table::{parse_format_arg, parse_format_setting, render_table, validate_columns, Column};

/// Lists routes with their views and allowed methods.
pub struct ProutesCommand;

/// Parsed `proutes` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProutesArgs {
    /// The configuration file.
    pub config_uri: Option<PathBuf>,
    /// `name=value` pairs substituted for `%(name)s` in the configuration.
    pub config_vars: Vec<String>,
    /// Only show rows whose name or pattern matches this glob.
    pub glob: Option<String>,
    /// Comma-separated columns to show.
    pub format: Option<String>,
}

impl ProutesArgs {
    /// Reads the arguments declared by [`ProutesCommand`].
    pub fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            config_uri: matches.get_one::<String>("config_uri").map(PathBuf::from),
            config_vars: matches
                .get_many::<String>("config_vars")
                .map(|vars| vars.cloned().collect())
                .unwrap_or_default(),
            glob: matches
                .get_one::<String>("glob")
                .filter(|g| !g.is_empty())
                .cloned(),
            format: matches
                .get_one::<String>("format")
                .filter(|f| !f.is_empty())
                .cloned(),
        }
    }
}

/// Runs `proutes`, writing the table to `out`.
///
/// A registry without a route mapper, or a mapper without routes, prints
/// nothing and succeeds.
///
/// # Errors
///
/// - [`RoutescopeError::ImproperlyConfigured`] without a configuration file
/// - [`RoutescopeError::InvalidColumns`] for unknown column names
/// - loader and manifest errors, and failures writing to `out`
pub fn run(args: &ProutesArgs, out: &mut impl Write) -> RoutescopeResult<()> {
    let config_uri = args.config_uri.as_deref().ok_or_else(|| {
        RoutescopeError::ImproperlyConfigured("requires a config file argument".to_string())
    })?;

    let vars = parse_vars(&args.config_vars)?;
    let settings = from_file_with_vars(config_uri, &vars)?;
    setup_logging(&settings);

    let mut requested = settings
        .proutes
        .format
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map_or_else(Column::available, parse_format_setting);

    let manifest_path = manifest_path(&settings, config_uri);
    let registry = RouteManifest::from_file_with_vars(manifest_path, &vars)?.build_registry()?;

    if let Some(format) = &args.format {
        requested = parse_format_arg(format);
    }
    let columns = validate_columns(&requested)?;

    let Some(mapper) = registry.mapper() else {
        tracing::info!("no route mapper configured");
        return Ok(());
    };
    if mapper.get_routes().is_empty() {
        tracing::info!("no routes configured");
        return Ok(());
    }

    let glob = args.glob.as_deref().map(GlobFilter::new).transpose()?;
    let rows: Vec<_> = resolve_routes(&registry)
        .into_iter()
        .filter(|row| glob.as_ref().map_or(true, |g| g.matches_row(row)))
        .collect();
    tracing::debug!(rows = rows.len(), glob = ?args.glob, "rendering route table");

    render_table(&rows, &columns, out)?;
    Ok(())
}

fn manifest_path<'a>(settings: &'a Settings, config_uri: &'a Path) -> &'a Path {
    settings.route_manifest.as_deref().unwrap_or(config_uri)
}

#[async_trait]
impl ManagementCommand for ProutesCommand {
    fn name(&self) -> &'static str {
        "proutes"
    }

    fn help(&self) -> &'static str {
        "Print all URL dispatch routes with their views and request methods"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("glob")
                .short('g')
                .long("glob")
                .help("Display routes matching glob pattern"),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .help("Choose which columns to display, separated by commas: name,pattern,view,method"),
        )
        .arg(
            clap::Arg::new("config_uri")
                .help("The URI to the configuration file"),
        )
        .arg(
            clap::Arg::new("config_vars")
                .num_args(0..)
                .help("Variables required by the config file, e.g. http_port=8080"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), RoutescopeError> {
        let args = ProutesArgs::from_matches(matches);
        let mut out = io::BufWriter::new(io::stdout());
        run(&args, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
