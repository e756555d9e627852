//! The route resolution engine.
//!
//! For every configured route, [`resolve_route`] works out which views the
//! application will actually invoke and which methods reach each of them,
//! producing one [`RouteRow`] per distinct view identity.
//!
//! Resolution never fails. A route without a request interface, without an
//! introspection record, or mounted as static files still yields a row, with
//! `<unknown>` and `*` standing in for what cannot be known.

use std::fmt;

use crate::methods::{reconcile, MethodContribution, RequestMethods, ANY_KEY};
use crate::registry::Registry;
use crate::route::Route;
use crate::view::{resolve_view_identity, UNKNOWN_KEY};

/// One line of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    /// The route name.
    pub name: String,
    /// The normalized pattern, or the external URL of a static mount.
    pub pattern: String,
    /// The view identity.
    pub view: String,
    /// The rendered allowed methods.
    pub method: String,
}

impl RouteRow {
    /// Creates a row.
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        view: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            view: view.into(),
            method: method.into(),
        }
    }
}

/// How far resolution got for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteState {
    /// No request interface: nothing can be dispatched.
    Unresolved,
    /// No introspection record: only the default view is known.
    IntrospectionDisabled,
    /// A static-file mount.
    StaticMount,
    /// A dynamic route with introspection data.
    Active,
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unresolved => "unresolved",
            Self::IntrospectionDisabled => "introspection-disabled",
            Self::StaticMount => "static",
            Self::Active => "active",
        })
    }
}

/// Resolves one route into its table rows.
///
/// Rows follow the order in which each distinct view identity is first seen
/// among the route's view records.
pub fn resolve_route(route: &Route, registry: &Registry) -> Vec<RouteRow> {
    let pattern = route.normalized_pattern();

    let Some(iface) = registry.query_request_interface(&route.name) else {
        log_state(route, RouteState::Unresolved);
        return vec![RouteRow::new(&route.name, pattern, UNKNOWN_KEY, ANY_KEY)];
    };

    let default_view = resolve_view_identity(registry.find_views(iface, "").first());

    let Some(route_intr) = registry.route_introspection(&route.name) else {
        log_state(route, RouteState::IntrospectionDisabled);
        let methods = reconcile(&RequestMethods::Any, &MethodContribution::new());
        return vec![RouteRow::new(&route.name, pattern, default_view, methods.to_string())];
    };

    if route_intr.is_static {
        log_state(route, RouteState::StaticMount);
        let external_url = route_intr
            .external_url
            .clone()
            .unwrap_or_else(|| pattern.into_owned());
        return vec![RouteRow::new(&route.name, external_url, UNKNOWN_KEY, ANY_KEY)];
    }

    log_state(route, RouteState::Active);

    let mut groups: Vec<(String, MethodContribution)> = Vec::new();

    for view in registry.related_views(&route.name) {
        let identity = resolve_view_identity(Some(&view.invoked_view()));
        match groups.iter().position(|(seen, _)| *seen == identity) {
            Some(i) => groups[i].1.add(&view.request_methods),
            None => {
                let mut contribution = MethodContribution::new();
                contribution.add(&view.request_methods);
                groups.push((identity, contribution));
            }
        }
    }

    if groups.is_empty() {
        groups.push((default_view, MethodContribution::new()));
    }

    groups
        .into_iter()
        .map(|(identity, contribution)| {
            let methods = reconcile(&route_intr.request_methods, &contribution);
            tracing::trace!(route = %route.name, view = %identity, methods = %methods, "reconciled view");
            RouteRow::new(&route.name, &*pattern, identity, methods.to_string())
        })
        .collect()
}

/// Resolves every route in the registry's mapper, in evaluation order.
///
/// Returns no rows when the registry has no mapper.
pub fn resolve_routes(registry: &Registry) -> Vec<RouteRow> {
    registry
        .mapper()
        .map(|mapper| {
            mapper
                .get_routes()
                .iter()
                .flat_map(|route| resolve_route(route, registry))
                .collect()
        })
        .unwrap_or_default()
}

fn log_state(route: &Route, state: RouteState) {
    tracing::debug!(route = %route.name, state = %state, "resolving route");
}
