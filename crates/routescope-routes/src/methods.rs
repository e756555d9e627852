//! Request-method constraints and their reconciliation.
//!
//! A route and each of its views may independently restrict which HTTP
//! methods they accept. [`reconcile`] combines the route-level constraint
//! with everything the views sharing one identity contributed, producing
//! the [`AllowedMethods`] that actually reach that view through that route.
//!
//! Constraints are reconciled symbolically. Each side is normalised to
//! either "only these methods" or "any method except these", and the
//! intersection is closed over those two forms, so a negated route
//! constraint never has to be expanded into a full method list.

use std::collections::BTreeSet;
use std::fmt;

/// Rendered when no constraint applies.
pub const ANY_KEY: &str = "*";

/// Rendered when the route and view constraints can never both be satisfied.
pub const MISMATCH_KEY: &str = "<route mismatch>";

/// Prefix marking an excluded method (`!POST`).
pub const EXCLUSION_MARKER: char = '!';

/// A method constraint as declared on a route or a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestMethods {
    /// No constraint.
    #[default]
    Any,
    /// Only these methods are accepted.
    Includes(BTreeSet<String>),
    /// Every method except these is accepted.
    Excludes(BTreeSet<String>),
}

impl RequestMethods {
    /// Accept only the given methods. Tokens are upper-cased.
    pub fn only<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Includes(normalize(methods))
    }

    /// Accept every method except the given ones. Tokens are upper-cased.
    pub fn excluding<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Excludes(normalize(methods))
    }

    /// Returns `true` unless this is [`RequestMethods::Any`].
    pub const fn is_constrained(&self) -> bool {
        !matches!(self, Self::Any)
    }
}

/// The method constraints accumulated for one view identity.
///
/// Several view records can resolve to the same identity; their constraints
/// are unioned here before being reconciled against the route. Excluded
/// methods are kept apart from included ones, never mixed into one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodContribution {
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
}

impl MethodContribution {
    /// Creates an empty contribution (no narrowing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record's constraint.
    pub fn add(&mut self, methods: &RequestMethods) {
        match methods {
            RequestMethods::Any => {}
            RequestMethods::Includes(set) => self.includes.extend(set.iter().cloned()),
            RequestMethods::Excludes(set) => self.excludes.extend(set.iter().cloned()),
        }
    }

    /// The methods views explicitly accept.
    pub const fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    /// The methods views explicitly reject.
    pub const fn excludes(&self) -> &BTreeSet<String> {
        &self.excludes
    }
}

impl From<&RequestMethods> for MethodContribution {
    fn from(methods: &RequestMethods) -> Self {
        let mut contribution = Self::new();
        contribution.add(methods);
        contribution
    }
}

/// The reconciled set of methods a route/view pair accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedMethods {
    /// Exactly these methods (never empty).
    Only(BTreeSet<String>),
    /// Any method except these (possibly none excluded).
    AnyExcept(BTreeSet<String>),
    /// No request can reach the view through the route.
    Mismatch,
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Only(methods) => write_joined(f, methods.iter().map(String::as_str)),
            Self::AnyExcept(excluded) => {
                let tokens: BTreeSet<String> = std::iter::once(ANY_KEY.to_string())
                    .chain(excluded.iter().map(|m| format!("{EXCLUSION_MARKER}{m}")))
                    .collect();
                write_joined(f, tokens.iter().map(String::as_str))
            }
            Self::Mismatch => f.write_str(MISMATCH_KEY),
        }
    }
}

/// Combines a route-level constraint with one view identity's contribution.
///
/// - neither side constrains: any method
/// - only one side constrains: that side's methods
/// - both constrain: the intersection
///
/// The view's exclusions are subtracted afterwards. An empty result when at
/// least one side constrained is [`AllowedMethods::Mismatch`].
///
/// # Examples
///
/// ```
/// use routescope_routes::methods::{reconcile, MethodContribution, RequestMethods};
///
/// let route = RequestMethods::only(["GET"]);
/// let view = MethodContribution::from(&RequestMethods::only(["GET", "POST"]));
/// assert_eq!(reconcile(&route, &view).to_string(), "GET");
///
/// let view = MethodContribution::from(&RequestMethods::only(["POST"]));
/// assert_eq!(reconcile(&route, &view).to_string(), "<route mismatch>");
/// ```
pub fn reconcile(route: &RequestMethods, view: &MethodContribution) -> AllowedMethods {
    let route_side = match route {
        RequestMethods::Any => Constraint::AnyExcept(BTreeSet::new()),
        RequestMethods::Includes(set) => Constraint::Only(set.clone()),
        RequestMethods::Excludes(set) => Constraint::AnyExcept(set.clone()),
    };
    let view_side = if view.includes.is_empty() {
        Constraint::AnyExcept(BTreeSet::new())
    } else {
        Constraint::Only(view.includes.clone())
    };
    let constrained = route.is_constrained() || !view.includes.is_empty();

    match route_side.intersect(view_side).subtract(&view.excludes) {
        Constraint::Only(methods) if methods.is_empty() && constrained => AllowedMethods::Mismatch,
        Constraint::Only(methods) => AllowedMethods::Only(methods),
        Constraint::AnyExcept(excluded) => AllowedMethods::AnyExcept(excluded),
    }
}

/// Internal symbolic form of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
    Only(BTreeSet<String>),
    AnyExcept(BTreeSet<String>),
}

impl Constraint {
    fn intersect(self, other: Self) -> Self {
        match (self, other) {
            (Self::Only(a), Self::Only(b)) => Self::Only(a.intersection(&b).cloned().collect()),
            (Self::Only(a), Self::AnyExcept(e)) | (Self::AnyExcept(e), Self::Only(a)) => {
                Self::Only(a.difference(&e).cloned().collect())
            }
            (Self::AnyExcept(mut a), Self::AnyExcept(b)) => {
                a.extend(b);
                Self::AnyExcept(a)
            }
        }
    }

    fn subtract(self, excludes: &BTreeSet<String>) -> Self {
        match self {
            Self::Only(methods) => Self::Only(methods.difference(excludes).cloned().collect()),
            Self::AnyExcept(mut excluded) => {
                excluded.extend(excludes.iter().cloned());
                Self::AnyExcept(excluded)
            }
        }
    }
}

fn normalize<I, S>(methods: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    methods
        .into_iter()
        .map(|m| m.as_ref().trim().to_ascii_uppercase())
        .collect()
}

fn write_joined<'a>(f: &mut fmt::Formatter<'_>, tokens: impl Iterator<Item = &'a str>) -> fmt::Result {
    for (i, token) in tokens.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(token)?;
    }
    Ok(())
}
