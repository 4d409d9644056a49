use quiver_core::Problem;

/// The closed set of capabilities an extension may declare.
///
/// Capability discovery is a query, not inheritance: one extension may
/// support several unrelated kinds at once, and a host must ask before
/// assuming any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// The extension can act as an optimization [`Problem`].
    Problem,
}

/// A typed view of one capability of an extension.
///
/// Views borrow from the extension, so they cannot be retained past the
/// release of the handle that produced them.
pub enum CapabilityRef<'a> {
    /// The extension viewed as an optimization problem.
    Problem(&'a mut dyn Problem),
}

impl CapabilityRef<'_> {
    /// Returns the kind this view was obtained for.
    #[must_use]
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Problem(_) => CapabilityKind::Problem,
        }
    }
}

/// The opaque object a plugin's factory constructs.
///
/// Implementations own their concrete capability objects and hand out
/// borrowed [`CapabilityRef`] views on request. `query` must return
/// `Some` exactly for the kinds `supports` reports.
pub trait Extension {
    /// Returns whether this extension can act as `kind`.
    fn supports(&self, kind: CapabilityKind) -> bool;

    /// Returns a typed view of this extension as `kind`, or `None` if the
    /// kind is unsupported.
    fn query(&mut self, kind: CapabilityKind) -> Option<CapabilityRef<'_>>;
}
