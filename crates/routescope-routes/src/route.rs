//! Configured routes.
//!
//! A [`Route`] is what the application's route mapper holds: a unique name
//! and a URL pattern. Routes are owned by the [`RouteMapper`] and never
//! change once registered.

use std::borrow::Cow;

/// A single configured route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The unique route name.
    pub name: String,
    /// The URL pattern as configured; it may lack a leading `/`.
    pub pattern: String,
    /// Whether this route is a static-file mount.
    pub is_static: bool,
    /// The external URL of a static mount.
    pub external_url: Option<String>,
}

impl Route {
    /// Creates a non-static route.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            is_static: false,
            external_url: None,
        }
    }

    /// Creates a static-file mount served at `external_url`.
    pub fn new_static(
        name: impl Into<String>,
        pattern: impl Into<String>,
        external_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            is_static: true,
            external_url: Some(external_url.into()),
        }
    }

    /// Returns the pattern with a leading `/`, adding one if missing.
    pub fn normalized_pattern(&self) -> Cow<'_, str> {
        if self.pattern.starts_with('/') {
            Cow::Borrowed(&self.pattern)
        } else {
            Cow::Owned(format!("/{}", self.pattern))
        }
    }
}

/// The ordered collection of routes, in the order they are evaluated.
#[derive(Debug, Clone, Default)]
pub struct RouteMapper {
    routes: Vec<Route>,
}

impl RouteMapper {
    /// Creates an empty mapper.
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route.
    pub fn connect(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Returns every route, static mounts included, in evaluation order.
    pub fn get_routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the route with the given name.
    pub fn get_route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }
}
