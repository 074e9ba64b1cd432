//! The host seam: how the oracle reads a type graph it does not own

use crate::types::{TypeHandle, TypeNode};

/// Read-only access to a host's static type information
///
/// Implementations resolve program locations to type handles and hand out
/// borrowed node data. Every method is a pure query; returning `None` means
/// "no type information", which the oracle treats as "could not be".
pub trait TypeGraphAccessor {
    /// Whatever the host uses to name a program location
    type Location: ?Sized;

    /// Type of the expression or declaration at `location`
    fn resolve_type(&self, location: &Self::Location) -> Option<TypeHandle>;

    /// Return type of a function-like location: the declared annotation when
    /// present, otherwise the inferred type of its body
    fn resolve_return_type(&self, location: &Self::Location) -> Option<TypeHandle>;

    /// Whether `location` is syntactically a function (declaration or expression)
    fn is_function_like(&self, location: &Self::Location) -> bool;

    /// Node data for a handle
    fn node(&self, handle: TypeHandle) -> Option<&TypeNode>;
}
