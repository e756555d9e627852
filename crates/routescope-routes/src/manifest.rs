//! Route manifests.
//!
//! A running application exports its route configuration as a manifest
//! (TOML or JSON). [`RouteManifest::build_registry`] turns it into the
//! [`Registry`] that resolution reads: the route mapper, a request interface
//! per dispatchable route, view candidates per interface, and introspection
//! records for the routes and views that have them.
//!
//! ```toml
//! [[routes]]
//! name = "cart"
//! pattern = "/cart"
//! request_methods = ["GET", "POST"]
//!
//! [[routes.views]]
//! callable = { kind = "function", module = "shop.views", name = "Cart" }
//! attr = "update"
//! request_methods = "POST"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use routescope_core::settings_loader::{is_json, read_with_vars};
use routescope_core::{RoutescopeError, RoutescopeResult};

use crate::introspection::{
    Introspectable, IntrospectionKey, RouteIntrospection, ViewIntrospection, VIEWS_CATEGORY,
};
use crate::methods::{RequestMethods, EXCLUSION_MARKER};
use crate::registry::Registry;
use crate::route::Route;
use crate::view::ViewCallable;

const fn default_true() -> bool {
    true
}

/// The whole manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteManifest {
    /// Route mapper settings.
    #[serde(default)]
    pub mapper: MapperEntry,
    /// Routes in evaluation order.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// The `[mapper]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct MapperEntry {
    /// `false` when the application has no route mapper at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MapperEntry {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// One `[[routes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    /// Unique route name.
    pub name: String,
    /// URL pattern.
    pub pattern: String,
    /// Route-level method constraint.
    #[serde(default)]
    pub request_methods: Option<MethodConstraint>,
    /// Whether an introspection record exists for the route.
    #[serde(default = "default_true")]
    pub introspectable: bool,
    /// Whether a request interface is registered for the route.
    #[serde(default = "default_true")]
    pub dispatchable: bool,
    /// Whether the route is a static-file mount.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// External URL of a static mount.
    #[serde(default)]
    pub external_url: Option<String>,
    /// Views registered for the route, in registration order.
    #[serde(default)]
    pub views: Vec<ViewEntry>,
}

/// One `[[routes.views]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewEntry {
    /// The registered view.
    pub callable: ViewCallable,
    /// Method invoked on the callable.
    #[serde(default)]
    pub attr: Option<String>,
    /// View-level method constraint.
    #[serde(default)]
    pub request_methods: Option<MethodConstraint>,
}

/// A method constraint as written in a manifest: `"GET"`, `"!POST"` or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MethodConstraint {
    /// A single method, optionally negated.
    One(String),
    /// Several methods, either all plain or all negated.
    Many(Vec<String>),
}

impl MethodConstraint {
    /// Converts the written form into a [`RequestMethods`].
    ///
    /// # Errors
    ///
    /// Returns [`RoutescopeError::ManifestError`] for an empty list, an empty
    /// token, or a list mixing plain and negated methods.
    pub fn to_request_methods(&self) -> RoutescopeResult<RequestMethods> {
        let tokens: Vec<&str> = match self {
            Self::One(token) => vec![token.as_str()],
            Self::Many(tokens) => tokens.iter().map(String::as_str).collect(),
        };
        if tokens.is_empty() {
            return Err(RoutescopeError::ManifestError(
                "request_methods must not be an empty list".to_string(),
            ));
        }

        let mut included = Vec::new();
        let mut excluded = Vec::new();
        for token in tokens {
            let token = token.trim();
            match token.strip_prefix(EXCLUSION_MARKER) {
                Some(method) => excluded.push(method.trim()),
                None => included.push(token),
            }
        }
        if included.iter().chain(&excluded).any(|m| m.is_empty()) {
            return Err(RoutescopeError::ManifestError(
                "request_methods contains an empty method".to_string(),
            ));
        }

        match (included.is_empty(), excluded.is_empty()) {
            (false, true) => Ok(RequestMethods::only(included)),
            (true, false) => Ok(RequestMethods::excluding(excluded)),
            _ => Err(RoutescopeError::ManifestError(format!(
                "request_methods cannot mix accepted and excluded methods: {self:?}"
            ))),
        }
    }
}

fn methods_of(constraint: Option<&MethodConstraint>, context: &str) -> RoutescopeResult<RequestMethods> {
    constraint.map_or(Ok(RequestMethods::Any), |constraint| {
        constraint.to_request_methods().map_err(|e| match e {
            RoutescopeError::ManifestError(msg) => {
                RoutescopeError::ManifestError(format!("{context}: {msg}"))
            }
            other => other,
        })
    })
}

impl RouteManifest {
    /// Parses a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or does not describe a manifest.
    pub fn from_toml_str(toml_str: &str) -> RoutescopeResult<Self> {
        toml::from_str(toml_str).map_err(|e| {
            RoutescopeError::ManifestError(format!("Failed to parse TOML manifest: {e}"))
        })
    }

    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not describe a manifest.
    pub fn from_json_str(json_str: &str) -> RoutescopeResult<Self> {
        serde_json::from_str(json_str).map_err(|e| {
            RoutescopeError::ManifestError(format!("Failed to parse JSON manifest: {e}"))
        })
    }

    /// Reads a manifest file, substituting `%(name)s` config variables first.
    ///
    /// `.json` files are parsed as JSON; everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file_with_vars(
        path: impl AsRef<Path>,
        vars: &std::collections::HashMap<String, String>,
    ) -> RoutescopeResult<Self> {
        let path = path.as_ref();
        let content = read_with_vars(path, vars)?;
        let manifest = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(path = %path.display(), routes = manifest.routes.len(), "loaded route manifest");
        Ok(manifest)
    }

    /// Builds the registry described by this manifest.
    ///
    /// # Errors
    ///
    /// Returns [`RoutescopeError::ManifestError`] for duplicate route names,
    /// static routes without an external URL, and invalid method constraints.
    pub fn build_registry(&self) -> RoutescopeResult<Registry> {
        let mut registry = Registry::new();
        if !self.mapper.enabled {
            return Ok(registry);
        }
        registry.ensure_mapper();

        let mut seen = HashSet::new();
        for entry in &self.routes {
            if !seen.insert(entry.name.as_str()) {
                return Err(RoutescopeError::ManifestError(format!(
                    "duplicate route name '{}'",
                    entry.name
                )));
            }
            register_route(&mut registry, entry)?;
        }

        Ok(registry)
    }
}

fn register_route(registry: &mut Registry, entry: &RouteEntry) -> RoutescopeResult<()> {
    let route_methods = methods_of(entry.request_methods.as_ref(), &format!("route '{}'", entry.name))?;

    let route = if entry.is_static {
        let external_url = entry.external_url.clone().ok_or_else(|| {
            RoutescopeError::ManifestError(format!(
                "static route '{}' requires external_url",
                entry.name
            ))
        })?;
        Route::new_static(&entry.name, &entry.pattern, external_url)
    } else {
        Route::new(&entry.name, &entry.pattern)
    };

    let mut views = Vec::with_capacity(entry.views.len());
    for (index, view) in entry.views.iter().enumerate() {
        let context = format!("route '{}' view #{index}", entry.name);
        views.push(ViewIntrospection {
            callable: view.callable.clone(),
            attr: view.attr.clone(),
            request_methods: methods_of(view.request_methods.as_ref(), &context)?,
        });
    }

    if entry.dispatchable {
        let iface = registry.register_request_interface(&entry.name);
        for view in &views {
            registry.register_view(&iface, "", view.callable.clone());
        }
    }

    if entry.introspectable {
        let route_key = IntrospectionKey::route(&entry.name);
        let introspector = registry.introspector_mut();
        introspector.add(
            route_key.clone(),
            Introspectable::Route(RouteIntrospection {
                name: route.name.clone(),
                pattern: route.pattern.clone(),
                request_methods: route_methods,
                is_static: route.is_static,
                external_url: route.external_url.clone(),
            }),
        );
        for (index, view) in views.into_iter().enumerate() {
            let view_key = IntrospectionKey::new(VIEWS_CATEGORY, format!("{}#{index}", entry.name));
            introspector.add(view_key.clone(), Introspectable::View(view));
            introspector.relate(&route_key, &view_key);
        }
    }

    registry.add_route(route);
    Ok(())
}
