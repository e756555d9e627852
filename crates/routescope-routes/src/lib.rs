//! # routescope-routes
//!
//! Route registry introspection: which view answers which URL pattern, and
//! for which HTTP methods.
//!
//! ## Modules
//!
//! - [`route`]: configured routes and the route mapper
//! - [`methods`]: request-method constraints and their reconciliation
//! - [`view`]: view callables and their human-readable identities
//! - [`introspection`]: the introspection graph (records plus relations)
//! - [`registry`]: the read-only registry the resolution engine queries
//! - [`manifest`]: building a registry from a TOML/JSON route manifest
//! - [`resolution`]: the route resolution engine
//!
//! # Examples
//!
//! ```
//! use routescope_routes::manifest::RouteManifest;
//! use routescope_routes::resolution::resolve_routes;
//!
//! let manifest = RouteManifest::from_toml_str(r#"
//!     [[routes]]
//!     name = "home"
//!     pattern = "about"
//!
//!     [[routes.views]]
//!     callable = { kind = "function", module = "app.views", name = "about" }
//!     request_methods = "GET"
//! "#).unwrap();
//! let registry = manifest.build_registry().unwrap();
//!
//! let rows = resolve_routes(&registry);
//! assert_eq!(rows[0].pattern, "/about");
//! assert_eq!(rows[0].view, "app.views.about");
//! assert_eq!(rows[0].method, "GET");
//! ```

pub mod introspection;
pub mod manifest;
pub mod methods;
pub mod registry;
pub mod resolution;
pub mod route;
pub mod view;

pub use introspection::{Introspectable, IntrospectionKey, Introspector, RouteIntrospection, ViewIntrospection};
pub use manifest::RouteManifest;
pub use methods::{reconcile, AllowedMethods, MethodContribution, RequestMethods};
pub use registry::{Registry, RequestInterface};
pub use resolution::{resolve_route, resolve_routes, RouteRow};
pub use route::{Route, RouteMapper};
pub use view::{resolve_view_identity, ViewCallable};
