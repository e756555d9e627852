//! The introspection graph.
//!
//! The host application records metadata about what it configured: one
//! record per route (category `routes`) and one per view registration
//! (category `views`). Records are addressed by `(category, discriminator)`
//! and linked to each other through an explicit, ordered relation list.
//!
//! The graph is populated once and only read afterwards.

use std::collections::HashMap;

use crate::methods::RequestMethods;
use crate::view::ViewCallable;

/// Category of route records; the discriminator is the route name.
pub const ROUTES_CATEGORY: &str = "routes";

/// Category of view records.
pub const VIEWS_CATEGORY: &str = "views";

/// Address of a record in the [`Introspector`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntrospectionKey {
    /// The record category (e.g. `routes`).
    pub category: String,
    /// The name of the record within its category.
    pub discriminator: String,
}

impl IntrospectionKey {
    /// Creates a key.
    pub fn new(category: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            discriminator: discriminator.into(),
        }
    }

    /// The key of the record describing route `name`.
    pub fn route(name: &str) -> Self {
        Self::new(ROUTES_CATEGORY, name)
    }
}

/// Metadata recorded for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntrospection {
    /// The route name.
    pub name: String,
    /// The pattern as configured.
    pub pattern: String,
    /// The route-level method constraint.
    pub request_methods: RequestMethods,
    /// Whether the route is a static-file mount.
    pub is_static: bool,
    /// The external URL of a static mount.
    pub external_url: Option<String>,
}

/// Metadata recorded for one view registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewIntrospection {
    /// The registered view.
    pub callable: ViewCallable,
    /// The method invoked on `callable`, if any.
    pub attr: Option<String>,
    /// The view-level method constraint.
    pub request_methods: RequestMethods,
}

impl ViewIntrospection {
    /// The view actually invoked, with `attr` applied.
    pub fn invoked_view(&self) -> ViewCallable {
        self.callable.clone().with_attr(self.attr.as_deref())
    }
}

/// A record stored in the [`Introspector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Introspectable {
    /// A route record.
    Route(RouteIntrospection),
    /// A view record.
    View(ViewIntrospection),
}

/// Records keyed by `(category, discriminator)` plus an ordered adjacency
/// list for related records.
#[derive(Debug, Clone, Default)]
pub struct Introspector {
    records: HashMap<IntrospectionKey, Introspectable>,
    related: HashMap<IntrospectionKey, Vec<IntrospectionKey>>,
}

impl Introspector {
    /// Creates an empty introspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `key`, replacing any previous record there.
    pub fn add(&mut self, key: IntrospectionKey, record: Introspectable) {
        self.records.insert(key, record);
    }

    /// Relates two records in both directions.
    ///
    /// Relations keep the order in which they were made; relating the same
    /// pair twice has no further effect.
    pub fn relate(&mut self, a: &IntrospectionKey, b: &IntrospectionKey) {
        for (from, to) in [(a, b), (b, a)] {
            let targets = self.related.entry(from.clone()).or_default();
            if !targets.contains(to) {
                targets.push(to.clone());
            }
        }
    }

    /// Returns the record stored under `(category, discriminator)`.
    pub fn get(&self, category: &str, discriminator: &str) -> Option<&Introspectable> {
        self.records
            .get(&IntrospectionKey::new(category, discriminator))
    }

    /// Returns the records related to `key`, in relation order.
    ///
    /// Related keys without a stored record are skipped.
    pub fn related(&self, key: &IntrospectionKey) -> Vec<&Introspectable> {
        self.related
            .get(key)
            .map(|keys| keys.iter().filter_map(|k| self.records.get(k)).collect())
            .unwrap_or_default()
    }

    /// Returns the route record for route `name`.
    pub fn route(&self, name: &str) -> Option<&RouteIntrospection> {
        match self.get(ROUTES_CATEGORY, name) {
            Some(Introspectable::Route(route)) => Some(route),
            _ => None,
        }
    }

    /// Returns the view records related to route `name`, in registration order.
    pub fn related_views(&self, name: &str) -> Vec<&ViewIntrospection> {
        self.related(&IntrospectionKey::route(name))
            .into_iter()
            .filter_map(|record| match record {
                Introspectable::View(view) => Some(view),
                Introspectable::Route(_) => None,
            })
            .collect()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
