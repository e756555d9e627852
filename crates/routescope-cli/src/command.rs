//! The `routescope` command line.
//!
//! [`build_cli`] declares the top-level `routescope` command with its
//! `proutes` subcommand, and [`execute`] dispatches parsed arguments to it.
//! Subcommands implement [`ManagementCommand`].
//!
//! ```rust
//! use routescope_cli::command::build_cli;
//!
//! let matches = build_cli()
//!     .try_get_matches_from(["routescope", "proutes", "development.toml"])
//!     .unwrap();
//! assert_eq!(matches.subcommand_name(), Some("proutes"));
//! ```

use async_trait::async_trait;
use routescope_core::logging::command_span;
use routescope_core::{RoutescopeError, Settings};
use tracing::Instrument;

use crate::commands::ProutesCommand;

/// A subcommand of the `routescope` binary.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The name the subcommand is invoked by.
    fn name(&self) -> &'static str;

    /// One-line help text.
    fn help(&self) -> &'static str;

    /// Declares the subcommand's arguments.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the subcommand with its parsed arguments.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), RoutescopeError>;
}

/// Builds the top-level `routescope` command.
pub fn build_cli() -> clap::Command {
    clap::Command::new("routescope")
        .about("Inspect the route table of a web application")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .subcommand(subcommand(&ProutesCommand))
}

fn subcommand(cmd: &dyn ManagementCommand) -> clap::Command {
    cmd.add_arguments(clap::Command::new(cmd.name()).about(cmd.help()))
}

/// Runs the subcommand selected in `matches`.
///
/// The subcommand runs inside a [`command_span`] named after it.
///
/// # Errors
///
/// Returns [`RoutescopeError::ConfigurationError`] when no known subcommand
/// was selected, otherwise whatever the subcommand returns.
pub async fn execute(matches: &clap::ArgMatches, settings: &Settings) -> Result<(), RoutescopeError> {
    match matches.subcommand() {
        Some((name, sub_matches)) if name == ProutesCommand.name() => {
            dispatch(&ProutesCommand, sub_matches, settings).await
        }
        Some((name, _)) => Err(RoutescopeError::ConfigurationError(format!(
            "Unknown command: {name}"
        ))),
        None => Err(RoutescopeError::ConfigurationError(
            "No subcommand specified".to_string(),
        )),
    }
}

async fn dispatch(
    cmd: &dyn ManagementCommand,
    matches: &clap::ArgMatches,
    settings: &Settings,
) -> Result<(), RoutescopeError> {
    cmd.handle(matches, settings)
        .instrument(command_span(cmd.name()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cli_declares_proutes() {
        let cli = build_cli();
        let names: Vec<_> = cli.get_subcommands().map(clap::Command::get_name).collect();
        assert_eq!(names, vec!["proutes"]);
    }

    #[test]
    fn test_build_cli_parses_proutes_arguments() {
        let matches = build_cli()
            .try_get_matches_from(["routescope", "proutes", "-f", "name", "dev.toml", "a=1"])
            .unwrap();
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "proutes");
        assert_eq!(sub_matches.get_one::<String>("format").unwrap(), "name");
        assert_eq!(sub_matches.get_one::<String>("config_uri").unwrap(), "dev.toml");
    }

    #[test]
    fn test_build_cli_requires_subcommand() {
        assert!(build_cli().try_get_matches_from(["routescope"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["routescope", "pviews"])
            .is_err());
    }

    #[tokio::test]
    async fn test_execute_reports_command_errors() {
        let matches = build_cli()
            .try_get_matches_from(["routescope", "proutes"])
            .unwrap();
        let err = execute(&matches, &Settings::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "requires a config file argument");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_execute_rejects_unknown_subcommand() {
        let matches = clap::Command::new("routescope")
            .subcommand(clap::Command::new("pviews"))
            .try_get_matches_from(["routescope", "pviews"])
            .unwrap();
        let err = execute(&matches, &Settings::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Unknown command: pviews");
    }

    #[tokio::test]
    async fn test_execute_without_subcommand() {
        let matches = clap::Command::new("routescope")
            .try_get_matches_from(["routescope"])
            .unwrap();
        assert!(execute(&matches, &Settings::default()).await.is_err());
    }
}
