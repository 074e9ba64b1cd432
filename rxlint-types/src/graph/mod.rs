//! In-memory reference host
//!
//! [`TypeGraph`] implements [`TypeGraphAccessor`] over nodes it owns, so the
//! oracle can run without an external type checker. Graphs are usually built
//! from a declaration fixture (see [`TypeGraph::from_declarations`]) but can
//! also be assembled node by node.
//!
//! Nodes live in a `petgraph` graph whose edges mirror the handles stored in
//! each node (bases, members, reference targets and arguments, resolved
//! `implements` clauses). The matcher never looks at the edges; they exist for
//! whole-graph questions such as [`TypeGraph::recursive_types`].

mod lowering;

use crate::accessor::TypeGraphAccessor;
use crate::types::{Composition, HeritageClause, TypeClass, TypeHandle, TypeNode};
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rxlint_decl::Span;
use std::collections::HashMap;

/// Relationship recorded between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Base,
    Member,
    ReferenceTarget,
    TypeArgument,
    Implements,
}

/// A named program location
#[derive(Debug, Clone, PartialEq)]
pub struct BindingInfo {
    pub ty: TypeHandle,
    /// Declared return annotation, else inferred body type
    pub return_type: Option<TypeHandle>,
    pub function_like: bool,
    pub span: Option<Span>,
}

/// Owned type graph with binding-name locations
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    graph: DiGraph<TypeNode, EdgeKind>,
    /// `(module, name)` of every declaration, in declaration order
    declarations: IndexMap<(Option<String>, String), TypeHandle>,
    bindings: IndexMap<String, BindingInfo>,
    /// Display names of symbol-less nodes (keywords)
    labels: HashMap<TypeHandle, String>,
    /// Return type of each function-type node
    function_returns: HashMap<TypeHandle, TypeHandle>,
}

const DESCRIBE_DEPTH: usize = 8;

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add a node, recording edges for every handle it mentions
    pub fn add_node(&mut self, node: TypeNode) -> TypeHandle {
        let edges = outgoing_edges(&node);
        let index = self.graph.add_node(node);
        let handle = TypeHandle::new(index.index());
        for (kind, to) in edges {
            self.add_edge(handle, to, kind);
        }
        handle
    }

    /// Append a base type to an existing node (allows cyclic graphs)
    pub fn add_base_type(&mut self, handle: TypeHandle, base: TypeHandle) {
        if let Some(node) = self.graph.node_weight_mut(index_of(handle)) {
            node.base_types.push(base);
            self.add_edge(handle, base, EdgeKind::Base);
        }
    }

    /// Append an `implements` clause, turning the node into a class-like declaration
    pub fn add_implements(&mut self, handle: TypeHandle, clause: HeritageClause) {
        let resolved = clause.resolved;
        if let Some(node) = self.graph.node_weight_mut(index_of(handle)) {
            node.heritage.get_or_insert_with(Default::default).implements.push(clause);
            if let Some(resolved) = resolved {
                self.add_edge(handle, resolved, EdgeKind::Implements);
            }
        }
    }

    /// Register `name` as a location of type `ty`
    pub fn bind(&mut self, name: impl Into<String>, ty: TypeHandle) {
        self.bindings.insert(
            name.into(),
            BindingInfo {
                ty,
                return_type: None,
                function_like: false,
                span: None,
            },
        );
    }

    /// Register `name` as a function-like location
    pub fn bind_function(
        &mut self,
        name: impl Into<String>,
        ty: TypeHandle,
        return_type: Option<TypeHandle>,
    ) {
        self.bindings.insert(
            name.into(),
            BindingInfo {
                ty,
                return_type,
                function_like: true,
                span: None,
            },
        );
    }

    /// Register a declared type under `(module, name)`
    pub fn declare(&mut self, module: Option<&str>, name: impl Into<String>, handle: TypeHandle) {
        self.declarations
            .insert((module.map(str::to_string), name.into()), handle);
    }

    /// Display name for a symbol-less node
    pub fn set_label(&mut self, handle: TypeHandle, label: impl Into<String>) {
        self.labels.insert(handle, label.into());
    }

    pub fn binding(&self, name: &str) -> Option<&BindingInfo> {
        self.bindings.get(name)
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &BindingInfo)> {
        self.bindings.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Declared type by name: a top-level declaration first, else the only
    /// module declaration with that name
    pub fn declared(&self, name: &str) -> Option<TypeHandle> {
        if let Some(handle) = self.declarations.get(&(None, name.to_string())) {
            return Some(*handle);
        }
        let mut found = self
            .declarations
            .iter()
            .filter(|((_, declared), _)| declared == name)
            .map(|(_, handle)| *handle);
        match (found.next(), found.next()) {
            (Some(handle), None) => Some(handle),
            _ => None,
        }
    }

    pub fn declared_in(&self, module: &str, name: &str) -> Option<TypeHandle> {
        self.declarations
            .get(&(Some(module.to_string()), name.to_string()))
            .copied()
    }

    /// Every declaration in order, as `(module, name, handle)`
    pub fn declarations(&self) -> impl Iterator<Item = (Option<&str>, &str, TypeHandle)> {
        self.declarations
            .iter()
            .map(|((module, name), handle)| (module.as_deref(), name.as_str(), *handle))
    }

    /// Strongly connected groups of nodes, i.e. recursive type definitions
    pub fn recursive_types(&self) -> Vec<Vec<TypeHandle>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|index| self.graph.contains_edge(*index, *index))
            })
            .map(|component| {
                let mut handles: Vec<TypeHandle> = component
                    .into_iter()
                    .map(|index| TypeHandle::new(index.index()))
                    .collect();
                handles.sort();
                handles
            })
            .collect()
    }

    /// Render a node as source-like text
    pub fn describe(&self, handle: TypeHandle) -> String {
        let mut out = String::new();
        self.describe_into(handle, 0, &mut out);
        out
    }

    fn describe_into(&self, handle: TypeHandle, depth: usize, out: &mut String) {
        if depth > DESCRIBE_DEPTH {
            out.push('…');
            return;
        }
        let Some(node) = self.node(handle) else {
            out.push_str("<missing>");
            return;
        };

        match &node.composition {
            Composition::Reference {
                target,
                type_arguments,
            } => {
                self.describe_into(*target, depth + 1, out);
                out.push('<');
                self.describe_list(type_arguments, ", ", depth, out);
                out.push('>');
            }
            Composition::Union(members) => self.describe_list(members, " | ", depth, out),
            Composition::Intersection(members) => self.describe_list(members, " & ", depth, out),
            Composition::Plain => {
                if let Some(return_type) = self.function_returns.get(&handle) {
                    out.push_str("(...) => ");
                    self.describe_into(*return_type, depth + 1, out);
                } else if let Some(label) = self.labels.get(&handle) {
                    out.push_str(label);
                } else if let Some(symbol) = &node.symbol {
                    out.push_str(&symbol.name);
                } else {
                    out.push_str(match node.class {
                        TypeClass::Any => "any",
                        TypeClass::Unknown => "unknown",
                        TypeClass::Primitive => "<primitive>",
                        TypeClass::Object => "{}",
                        TypeClass::TypeParameter => "<type parameter>",
                    });
                }
            }
        }
    }

    fn describe_list(&self, handles: &[TypeHandle], separator: &str, depth: usize, out: &mut String) {
        for (i, handle) in handles.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.describe_into(*handle, depth + 1, out);
        }
    }

    fn add_edge(&mut self, from: TypeHandle, to: TypeHandle, kind: EdgeKind) {
        let (from, to) = (index_of(from), index_of(to));
        if to.index() < self.graph.node_count() {
            self.graph.add_edge(from, to, kind);
        }
    }

    fn node_mut(&mut self, handle: TypeHandle) -> Option<&mut TypeNode> {
        self.graph.node_weight_mut(index_of(handle))
    }
}

impl TypeGraphAccessor for TypeGraph {
    type Location = str;

    /// Bindings shadow declarations of the same name
    fn resolve_type(&self, location: &str) -> Option<TypeHandle> {
        self.bindings
            .get(location)
            .map(|binding| binding.ty)
            .or_else(|| self.declared(location))
    }

    fn resolve_return_type(&self, location: &str) -> Option<TypeHandle> {
        self.bindings.get(location)?.return_type
    }

    fn is_function_like(&self, location: &str) -> bool {
        self.bindings
            .get(location)
            .is_some_and(|binding| binding.function_like)
    }

    fn node(&self, handle: TypeHandle) -> Option<&TypeNode> {
        self.graph.node_weight(index_of(handle))
    }
}

fn index_of(handle: TypeHandle) -> NodeIndex {
    NodeIndex::new(handle.index())
}

fn outgoing_edges(node: &TypeNode) -> Vec<(EdgeKind, TypeHandle)> {
    let mut edges = Vec::new();
    match &node.composition {
        Composition::Plain => {}
        Composition::Reference {
            target,
            type_arguments,
        } => {
            edges.push((EdgeKind::ReferenceTarget, *target));
            edges.extend(type_arguments.iter().map(|arg| (EdgeKind::TypeArgument, *arg)));
        }
        Composition::Union(members) | Composition::Intersection(members) => {
            edges.extend(members.iter().map(|member| (EdgeKind::Member, *member)));
        }
    }
    edges.extend(node.base_types.iter().map(|base| (EdgeKind::Base, *base)));
    edges.extend(
        node.implemented()
            .iter()
            .filter_map(|clause| clause.resolved)
            .map(|resolved| (EdgeKind::Implements, resolved)),
    );
    edges
}
