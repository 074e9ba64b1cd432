//! Structural could-be matcher
//!
//! Decides whether a type node *could be* an instance of a named type. The walk
//! over-approximates: it answers `true` as soon as any plausible route to the
//! target exists and never claims that a type definitely is the target.
//!
//! For each node, in order, first match wins:
//!
//! 1. a generic instantiation is replaced by its generic origin (type
//!    arguments are ignored)
//! 2. the node's own symbol is tested against the name and, if present, the
//!    module qualifier
//! 3. union **and** intersection members are tried; any member suffices
//! 4. direct base types are tried
//! 5. class-like declarations fall back to their syntactic `implements` list
//!
//! Intersections deliberately share the union rule, so `A & B` could be `A`
//! and could be `B` independently.

use crate::accessor::TypeGraphAccessor;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::target::TargetDescriptor;
use crate::types::{HeritageClause, Symbol, TypeHandle, TypeNode};
use std::collections::HashMap;
use tracing::trace;

/// Recursive could-be oracle over a host type graph
pub struct StructuralMatcher<'g, G: TypeGraphAccessor + ?Sized> {
    graph: &'g G,
    max_depth: usize,
}

impl<'g, G: TypeGraphAccessor + ?Sized> StructuralMatcher<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::with_max_depth(graph, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(graph: &'g G, max_depth: usize) -> Self {
        Self { graph, max_depth }
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Could the type behind `handle` be an instance of `target`?
    pub fn could_be_type(&self, handle: TypeHandle, target: &TargetDescriptor) -> bool {
        let mut visited = HashMap::new();
        let matched = self.visit(handle, target, 0, &mut visited);
        trace!(%handle, %target, matched, visited = visited.len(), "could_be_type");
        matched
    }

    fn visit(
        &self,
        handle: TypeHandle,
        target: &TargetDescriptor,
        depth: usize,
        visited: &mut HashMap<TypeHandle, usize>,
    ) -> bool {
        if depth > self.max_depth {
            trace!(%handle, depth, "depth bound reached");
            return false;
        }
        if !Self::enter(handle, depth, visited) {
            trace!(%handle, depth, "already visited");
            return false;
        }
        let Some(node) = self.graph.node(handle) else {
            return false;
        };

        let node = match node.reference_target() {
            Some(origin) if origin != handle => {
                if !Self::enter(origin, depth, visited) {
                    return false;
                }
                self.graph.node(origin).unwrap_or(node)
            }
            _ => node,
        };

        if self.is_direct_match(node, target) {
            trace!(%handle, symbol = ?node.symbol, "direct match");
            return true;
        }

        if node
            .composition
            .members()
            .iter()
            .any(|member| self.visit(*member, target, depth + 1, visited))
        {
            return true;
        }

        if node
            .base_types
            .iter()
            .any(|base| self.visit(*base, target, depth + 1, visited))
        {
            return true;
        }

        if node
            .implemented()
            .iter()
            .any(|clause| self.heritage_matches(clause, target))
        {
            trace!(%handle, "matched through implements clause");
            return true;
        }

        false
    }

    /// Record that `handle` is expanded at `depth`.
    ///
    /// A node already expanded at the same or a shallower depth is skipped;
    /// reaching it shallower expands it again with the larger remaining budget.
    fn enter(handle: TypeHandle, depth: usize, visited: &mut HashMap<TypeHandle, usize>) -> bool {
        match visited.get(&handle) {
            Some(&seen) if seen <= depth => false,
            _ => {
                visited.insert(handle, depth);
                true
            }
        }
    }

    fn is_direct_match(&self, node: &TypeNode, target: &TargetDescriptor) -> bool {
        node.symbol.as_ref().is_some_and(|symbol| {
            target.matches_name(&symbol.name) && target.matches_module(symbol.module.as_deref())
        })
    }

    /// Text match on the identifier; with a qualifier the identifier must also
    /// resolve to a symbol declared in a matching module.
    fn heritage_matches(&self, clause: &HeritageClause, target: &TargetDescriptor) -> bool {
        if target.is_qualified() {
            let module = clause
                .resolved
                .and_then(|handle| self.declared_symbol(handle))
                .and_then(|symbol| symbol.module.as_deref());
            if !target.matches_module(module) {
                return false;
            }
        }
        target.matches_name(&clause.text)
    }

    /// Symbol of a node, looking through one level of generic instantiation
    fn declared_symbol(&self, handle: TypeHandle) -> Option<&'g Symbol> {
        let node = self.graph.node(handle)?;
        if let Some(symbol) = &node.symbol {
            return Some(symbol);
        }
        let origin = node.reference_target()?;
        self.graph.node(origin)?.symbol.as_ref()
    }
}
