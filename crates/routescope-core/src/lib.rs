//! # routescope-core
//!
//! Core types, settings, and error types for routescope.
//! This crate has no routing knowledge and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Tool settings
//! - [`settings_loader`] - Loading settings from TOML/JSON files, config variables and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RoutescopeError, RoutescopeResult};
pub use settings::{ProutesSettings, Settings};
