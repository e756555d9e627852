//! The application registry as seen by route resolution.
//!
//! A [`Registry`] bundles the pieces of application state the resolution
//! engine reads: the route mapper, the request interface registered for
//! each dispatchable route, the view candidates registered against each
//! interface, and the [`Introspector`].

use std::collections::HashMap;

use crate::introspection::{Introspector, RouteIntrospection, ViewIntrospection};
use crate::route::{Route, RouteMapper};
use crate::view::ViewCallable;

/// Marks requests matched by one particular route.
///
/// Views are registered against an interface, not against the route itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestInterface(String);

impl RequestInterface {
    /// The interface for requests matched by route `route_name`.
    pub fn for_route(route_name: &str) -> Self {
        Self(format!("{route_name}_IRequest"))
    }

    /// The interface name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only registry queried by the resolution engine.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    mapper: Option<RouteMapper>,
    request_ifaces: HashMap<String, RequestInterface>,
    views: HashMap<(RequestInterface, String), Vec<ViewCallable>>,
    introspector: Introspector,
}

impl Registry {
    /// Creates an empty registry with no route mapper.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Population ───────────────────────────────────────────────────

    /// Installs an empty route mapper if none exists yet.
    pub fn ensure_mapper(&mut self) -> &mut RouteMapper {
        self.mapper.get_or_insert_with(RouteMapper::new)
    }

    /// Appends a route to the mapper, creating the mapper if needed.
    pub fn add_route(&mut self, route: Route) {
        self.ensure_mapper().connect(route);
    }

    /// Registers the request interface for route `route_name` and returns it.
    pub fn register_request_interface(&mut self, route_name: &str) -> RequestInterface {
        self.request_ifaces
            .entry(route_name.to_string())
            .or_insert_with(|| RequestInterface::for_route(route_name))
            .clone()
    }

    /// Registers `view` against `iface` under the qualifying `name`.
    pub fn register_view(&mut self, iface: &RequestInterface, name: &str, view: ViewCallable) {
        self.views
            .entry((iface.clone(), name.to_string()))
            .or_default()
            .push(view);
    }

    /// Mutable access to the introspector while populating.
    pub fn introspector_mut(&mut self) -> &mut Introspector {
        &mut self.introspector
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The route mapper, or `None` when the application has none.
    pub const fn mapper(&self) -> Option<&RouteMapper> {
        self.mapper.as_ref()
    }

    /// The request interface registered for route `route_name`.
    pub fn query_request_interface(&self, route_name: &str) -> Option<&RequestInterface> {
        self.request_ifaces.get(route_name)
    }

    /// The views registered against `iface` under the qualifying `name`,
    /// in registration order.
    pub fn find_views(&self, iface: &RequestInterface, name: &str) -> &[ViewCallable] {
        self.views
            .get(&(iface.clone(), name.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// The introspector.
    pub const fn introspector(&self) -> &Introspector {
        &self.introspector
    }

    /// Shorthand for the `('routes', name)` introspection record.
    pub fn route_introspection(&self, route_name: &str) -> Option<&RouteIntrospection> {
        self.introspector.route(route_name)
    }

    /// Shorthand for the view records related to route `route_name`.
    pub fn related_views(&self, route_name: &str) -> Vec<&ViewIntrospection> {
        self.introspector.related_views(route_name)
    }
}
