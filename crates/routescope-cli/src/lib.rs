//! # routescope-cli
//!
//! Management commands for routescope.
//!
//! This crate provides:
//!
//! - **Command line** - The `routescope` clap command and its `proutes`
//!   subcommand
//! - **Route table** - Column selection and aligned rendering of resolved routes
//! - **Glob filtering** - Shell-glob matching against route names and patterns
//!
//! ## Quick Start
//!
//! ```rust
//! use routescope_cli::build_cli;
//!
//! let matches = build_cli()
//!     .try_get_matches_from(["routescope", "proutes", "-g", "api_*", "app.toml"])
//!     .unwrap();
//! let (name, args) = matches.subcommand().unwrap();
//! assert_eq!(name, "proutes");
//! assert_eq!(args.get_one::<String>("glob").unwrap(), "api_*");
//! ```

// These clippy lints are intentionally allowed:
// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: some functions may gain runtime logic later
// - unused_async: command handlers maintain consistent async signatures
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;
pub mod glob;
pub mod table;

// Re-export primary types at the crate root for convenience.
pub use command::{build_cli, execute, ManagementCommand};
pub use commands::ProutesCommand;
pub use glob::GlobFilter;
pub use table::{render_table, validate_columns, Column};
