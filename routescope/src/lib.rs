//! # routescope
//!
//! Route table introspection for web applications: which view answers which
//! URL pattern, and for which request methods.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `routescope` for everything, or on individual crates for finer control.
//!
//! ```
//! use routescope::prelude::*;
//!
//! let registry = RouteManifest::from_toml_str(r#"
//!     [[routes]]
//!     name = "health"
//!     pattern = "health"
//! "#).unwrap().build_registry().unwrap();
//!
//! let rows = resolve_routes(&registry);
//! assert_eq!(rows[0].pattern, "/health");
//! assert_eq!(rows[0].view, "<unknown>");
//! ```

/// Error type, settings, settings loading, and logging setup.
pub use routescope_core as core;

/// Routes, method reconciliation, view identities, the registry, and resolution.
pub use routescope_routes as routes;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use routescope_cli as cli;

/// The most commonly used types.
pub mod prelude {
    pub use routescope_core::{RoutescopeError, RoutescopeResult, Settings};
    pub use routescope_routes::{
        reconcile, resolve_route, resolve_routes, resolve_view_identity, AllowedMethods,
        Registry, RequestMethods, Route, RouteManifest, RouteRow, ViewCallable,
    };

    #[cfg(feature = "cli")]
    pub use routescope_cli::{build_cli, ManagementCommand};
}
