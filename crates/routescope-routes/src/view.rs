//! View callables and their identities.
//!
//! The identity of a view is the string the route table prints in its
//! `View` column: usually `module.name`, `package:docroot` for static-file
//! views, and `<unknown>` when no view could be found at all.

use serde::{Deserialize, Serialize};

/// Printed when a route has no resolvable view.
pub const UNKNOWN_KEY: &str = "<unknown>";

/// Printed instead of the generic protocol-adapter wrapper.
pub const WSGIAPP_KEY: &str = "<wsgiapp>";

/// Where the host framework defines the wrapper it puts around raw
/// protocol applications. Its name says nothing about the wrapped app.
pub const ADAPTER_LOCATION: &str = "pyramid.router.decorator";

/// A view as registered against a route.
///
/// # Examples
///
/// ```
/// use routescope_routes::view::{resolve_view_identity, ViewCallable};
///
/// let view = ViewCallable::function("shop.views", "CartView").with_attr(Some("checkout"));
/// assert_eq!(resolve_view_identity(Some(&view)), "shop.views.CartView.checkout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewCallable {
    /// A plain function or class.
    Function {
        /// Dotted module path.
        module: String,
        /// Function or class name.
        name: String,
    },
    /// A named method invoked on an instance of `target`.
    BoundMethod {
        /// The class or object the method is looked up on.
        target: Box<ViewCallable>,
        /// The method name.
        attr: String,
    },
    /// A view serving files from a directory.
    StaticFile {
        /// The package the document root belongs to, when known.
        #[serde(default)]
        package: Option<String>,
        /// The document root.
        docroot: String,
    },
    /// A view dispatching to several others (no name of its own).
    Aggregate {
        /// Dotted module path of the aggregate type.
        module: String,
        /// The aggregate's textual representation.
        repr: String,
    },
}

impl ViewCallable {
    /// Shorthand for [`ViewCallable::Function`].
    pub fn function(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Function {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Wraps `self` in [`ViewCallable::BoundMethod`] when `attr` is set.
    #[must_use]
    pub fn with_attr(self, attr: Option<impl Into<String>>) -> Self {
        match attr {
            Some(attr) => Self::BoundMethod {
                target: Box::new(self),
                attr: attr.into(),
            },
            None => self,
        }
    }
}

/// Derives the identity printed for `view`.
///
/// - `None` is [`UNKNOWN_KEY`].
/// - A static-file view is `package:docroot`, or `docroot` without a package.
/// - A bound method is the identity of its target followed by `.attr`.
/// - Anything else is `module.name`, except that the protocol-adapter
///   wrapper becomes [`WSGIAPP_KEY`].
pub fn resolve_view_identity(view: Option<&ViewCallable>) -> String {
    let Some(view) = view else {
        return UNKNOWN_KEY.to_string();
    };

    match view {
        ViewCallable::StaticFile {
            package: Some(package),
            docroot,
        } => format!("{package}:{docroot}"),
        ViewCallable::StaticFile { package: None, docroot } => docroot.clone(),
        ViewCallable::BoundMethod { target, attr } => {
            format!("{}.{attr}", resolve_view_identity(Some(target.as_ref())))
        }
        ViewCallable::Function { module, name } => qualified(module, name),
        ViewCallable::Aggregate { module, repr } => qualified(module, repr),
    }
}

fn qualified(module: &str, name: &str) -> String {
    let identity = format!("{module}.{name}");
    if identity == ADAPTER_LOCATION {
        WSGIAPP_KEY.to_string()
    } else {
        identity
    }
}
