//! Derived predicates built on the structural matcher

use crate::accessor::TypeGraphAccessor;
use crate::matcher::StructuralMatcher;
use crate::target::TargetDescriptor;
use crate::types::{Composition, TypeClass, TypeHandle};

/// Callable either structurally (has call signatures) or nominally (could be
/// one of the configured function-wrapper types).
pub fn could_be_function<G, S>(
    matcher: &StructuralMatcher<'_, G>,
    handle: TypeHandle,
    function_wrappers: &[S],
) -> bool
where
    G: TypeGraphAccessor + ?Sized,
    S: AsRef<str>,
{
    let Some(node) = matcher.graph().node(handle) else {
        return false;
    };
    if node.call_signatures > 0 {
        return true;
    }
    function_wrappers.iter().any(|name| {
        matcher.could_be_type(handle, &TargetDescriptor::exact(name.as_ref()))
    })
}

/// Could the return type of the function-like `location` be `target`?
///
/// The host picks the declared return annotation over the inferred body type;
/// a location with neither yields `false`.
pub fn could_return_type<G>(
    matcher: &StructuralMatcher<'_, G>,
    location: &G::Location,
    target: &TargetDescriptor,
) -> bool
where
    G: TypeGraphAccessor + ?Sized,
{
    match matcher.graph().resolve_return_type(location) {
        Some(handle) => matcher.could_be_type(handle, target),
        None => false,
    }
}

pub fn is_any<G: TypeGraphAccessor + ?Sized>(graph: &G, handle: TypeHandle) -> bool {
    graph
        .node(handle)
        .is_some_and(|node| node.class == TypeClass::Any)
}

pub fn is_unknown<G: TypeGraphAccessor + ?Sized>(graph: &G, handle: TypeHandle) -> bool {
    graph
        .node(handle)
        .is_some_and(|node| node.class == TypeClass::Unknown)
}

/// Object type carrying a generic-instantiation marker
pub fn is_reference_type<G: TypeGraphAccessor + ?Sized>(graph: &G, handle: TypeHandle) -> bool {
    graph.node(handle).is_some_and(|node| {
        node.class == TypeClass::Object && matches!(node.composition, Composition::Reference { .. })
    })
}
