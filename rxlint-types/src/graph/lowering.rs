//! Lowering of a parsed declaration file into a [`TypeGraph`]
//!
//! Runs in three passes. Every class and interface first gets its declared
//! node so that references may point forward. Heritage, signatures and
//! bindings are then lowered against those nodes, resolving aliases on demand.
//! Finally call-signature counts are propagated through interface bases and
//! into generic instantiations.
//!
//! Unqualified names resolve in this order: type parameters in scope, the
//! enclosing module, top-level declarations, then the single module that
//! declares the name.

use super::{BindingInfo, TypeGraph};
use crate::accessor::TypeGraphAccessor;
use crate::error::{GraphError, to_source_span};
use crate::types::{HeritageClause, Symbol, TypeClass, TypeHandle, TypeNode};
use indexmap::IndexMap;
use rxlint_decl::{
    AliasDeclaration, Binding, Declaration, DeclarationFile, Identifier, Parameter, TypeExpr,
    TypeKeyword, TypeReference,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Symbol name hosts give anonymous function types
const FUNCTION_TYPE_SYMBOL: &str = "__type";

type DeclKey = (Option<String>, String);

enum Entry<'a> {
    Declared {
        handle: TypeHandle,
        type_params: Vec<(String, TypeHandle)>,
    },
    Alias {
        decl: &'a AliasDeclaration,
        module: Option<&'a str>,
    },
}

enum Found {
    TypeParameter(TypeHandle),
    Declaration(DeclKey),
}

/// Names visible while lowering one type expression
struct Scope<'a> {
    module: Option<&'a str>,
    type_params: Vec<(String, TypeHandle)>,
}

impl<'a> Scope<'a> {
    fn top_level() -> Self {
        Self {
            module: None,
            type_params: Vec::new(),
        }
    }

    fn module(module: Option<&'a str>) -> Self {
        Self {
            module,
            type_params: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Lowerer<'a> {
    graph: TypeGraph,
    entries: IndexMap<DeclKey, Entry<'a>>,
    modules: HashSet<&'a str>,
    aliases: HashMap<DeclKey, TypeHandle>,
    alias_stack: Vec<DeclKey>,
    keywords: HashMap<TypeKeyword, TypeHandle>,
}

impl TypeGraph {
    /// Build a graph from a parsed declaration file
    ///
    /// Every top-level binding becomes a location named after the binding.
    pub fn from_declarations(file: &DeclarationFile) -> Result<Self, GraphError> {
        let mut lowerer = Lowerer::default();
        lowerer.declare_all(file)?;
        lowerer.lower_declarations(file)?;
        lowerer.lower_bindings(file)?;
        lowerer.propagate_call_signatures();

        let graph = lowerer.graph;
        debug!(
            source = file.source_file.as_deref().unwrap_or("<input>"),
            nodes = graph.len(),
            declarations = graph.declarations.len(),
            bindings = graph.bindings.len(),
            "lowered declaration file"
        );
        Ok(graph)
    }
}

impl<'a> Lowerer<'a> {
    // =========================================================================
    // Pass 1: declared nodes
    // =========================================================================

    fn declare_all(&mut self, file: &'a DeclarationFile) -> Result<(), GraphError> {
        for (module, decl) in file.declarations() {
            if let Some(module) = module {
                self.modules.insert(module);
            }

            let name = decl.name();
            let key = (module.map(str::to_string), name.name.clone());
            if self.entries.contains_key(&key) {
                return Err(GraphError::DuplicateDeclaration {
                    name: name.name.clone(),
                    span: to_source_span(name.span),
                });
            }

            let entry = match decl {
                Declaration::Alias(alias) => Entry::Alias { decl: alias, module },
                Declaration::Class(_) | Declaration::Interface(_) => {
                    let symbol = match module {
                        Some(module) => Symbol::in_module(name.name.clone(), module),
                        None => Symbol::global(name.name.clone()),
                    };
                    let mut node = TypeNode::object(symbol);
                    if matches!(decl, Declaration::Class(_)) {
                        node = node.with_heritage(Vec::new());
                    }
                    let handle = self.graph.add_node(node);
                    self.graph.declare(module, name.name.clone(), handle);

                    let type_params = decl
                        .type_params()
                        .iter()
                        .map(|param| (param.name.clone(), self.type_parameter(param)))
                        .collect();
                    Entry::Declared {
                        handle,
                        type_params,
                    }
                }
            };
            self.entries.insert(key, entry);
        }
        Ok(())
    }

    fn type_parameter(&mut self, param: &Identifier) -> TypeHandle {
        let node = TypeNode::anonymous(TypeClass::TypeParameter)
            .with_symbol(Symbol::global(param.name.clone()));
        self.graph.add_node(node)
    }

    // =========================================================================
    // Pass 2: heritage, signatures and bindings
    // =========================================================================

    fn lower_declarations(&mut self, file: &'a DeclarationFile) -> Result<(), GraphError> {
        for (module, decl) in file.declarations() {
            let key = (module.map(str::to_string), decl.name().name.clone());
            match decl {
                Declaration::Alias(_) => {
                    self.lower_alias(&key)?;
                }
                Declaration::Class(class) => {
                    let (handle, scope) = self.declaration_scope(&key, module)?;
                    if let Some(base) = &class.extends {
                        let base = self.lower_reference(base, &scope)?;
                        self.graph.add_base_type(handle, base);
                    }
                    for clause in &class.implements {
                        let resolved = self.heritage_target(clause, &scope);
                        self.graph.add_implements(
                            handle,
                            HeritageClause::new(clause.name.name.clone(), resolved),
                        );
                    }
                }
                Declaration::Interface(interface) => {
                    let (handle, scope) = self.declaration_scope(&key, module)?;
                    for base in &interface.extends {
                        let base = self.lower_reference(base, &scope)?;
                        self.graph.add_base_type(handle, base);
                    }
                    for signature in &interface.call_signatures {
                        self.lower_params(&signature.params, &scope)?;
                        self.lower_type(&signature.return_type, &scope)?;
                    }
                    if let Some(node) = self.graph.node_mut(handle) {
                        node.call_signatures = interface.call_signatures.len();
                    }
                }
            }
        }
        Ok(())
    }

    fn declaration_scope(
        &self,
        key: &DeclKey,
        module: Option<&'a str>,
    ) -> Result<(TypeHandle, Scope<'a>), GraphError> {
        match self.entries.get(key) {
            Some(Entry::Declared {
                handle,
                type_params,
            }) => Ok((
                *handle,
                Scope {
                    module,
                    type_params: type_params.clone(),
                },
            )),
            _ => Err(GraphError::UnresolvedType {
                name: key.1.clone(),
                span: None,
            }),
        }
    }

    /// Declared type named by an `implements` clause, if it resolves at all
    fn heritage_target(&mut self, clause: &TypeReference, scope: &Scope<'a>) -> Option<TypeHandle> {
        match self.lookup(clause, scope).ok()? {
            Found::TypeParameter(_) => None,
            Found::Declaration(key) => match self.entries.get(&key)? {
                Entry::Declared { handle, .. } => Some(*handle),
                Entry::Alias { .. } => self.lower_alias(&key).ok(),
            },
        }
    }

    fn lower_bindings(&mut self, file: &'a DeclarationFile) -> Result<(), GraphError> {
        let scope = Scope::top_level();
        for binding in file.bindings() {
            let name = binding.name();
            if self.graph.bindings.contains_key(&name.name) {
                return Err(GraphError::DuplicateBinding {
                    name: name.name.clone(),
                    span: to_source_span(name.span),
                });
            }

            let info = match binding {
                Binding::Let(binding) => {
                    let ty = self.lower_type(&binding.type_annotation, &scope)?;
                    let return_type = match &binding.type_annotation {
                        TypeExpr::Function { .. } => self.graph.function_returns.get(&ty).copied(),
                        _ => None,
                    };
                    BindingInfo {
                        ty,
                        return_type,
                        function_like: false,
                        span: Some(binding.span),
                    }
                }
                Binding::Fn(binding) => {
                    self.lower_params(&binding.params, &scope)?;
                    let declared = binding
                        .return_annotation
                        .as_ref()
                        .map(|expr| self.lower_type(expr, &scope))
                        .transpose()?;
                    let inferred = binding
                        .inferred_body
                        .as_ref()
                        .map(|expr| self.lower_type(expr, &scope))
                        .transpose()?;
                    let return_type = declared.or(inferred);

                    let node = TypeNode::object(Symbol::global(name.name.clone()))
                        .with_call_signatures(1);
                    let ty = self.graph.add_node(node);
                    if let Some(return_type) = return_type {
                        self.graph.function_returns.insert(ty, return_type);
                    }
                    BindingInfo {
                        ty,
                        return_type,
                        function_like: true,
                        span: Some(binding.span),
                    }
                }
            };
            self.graph.bindings.insert(name.name.clone(), info);
        }
        Ok(())
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn lower_type(&mut self, expr: &TypeExpr, scope: &Scope<'a>) -> Result<TypeHandle, GraphError> {
        match expr {
            TypeExpr::Keyword { keyword, .. } => Ok(self.keyword(*keyword)),
            TypeExpr::Reference(reference) => self.lower_reference(reference, scope),
            TypeExpr::Function {
                params,
                return_type,
                ..
            } => {
                self.lower_params(params, scope)?;
                let return_type = self.lower_type(return_type, scope)?;
                let node =
                    TypeNode::object(Symbol::global(FUNCTION_TYPE_SYMBOL)).with_call_signatures(1);
                let handle = self.graph.add_node(node);
                self.graph.function_returns.insert(handle, return_type);
                Ok(handle)
            }
            TypeExpr::Union { members, .. } => {
                let members = self.lower_all(members, scope)?;
                Ok(self.graph.add_node(TypeNode::union(members)))
            }
            TypeExpr::Intersection { members, .. } => {
                let members = self.lower_all(members, scope)?;
                Ok(self.graph.add_node(TypeNode::intersection(members)))
            }
        }
    }

    fn lower_all(
        &mut self,
        exprs: &[TypeExpr],
        scope: &Scope<'a>,
    ) -> Result<Vec<TypeHandle>, GraphError> {
        exprs.iter().map(|expr| self.lower_type(expr, scope)).collect()
    }

    fn lower_params(&mut self, params: &[Parameter], scope: &Scope<'a>) -> Result<(), GraphError> {
        for param in params {
            self.lower_type(&param.type_annotation, scope)?;
        }
        Ok(())
    }

    /// Keyword types are shared nodes without a symbol
    fn keyword(&mut self, keyword: TypeKeyword) -> TypeHandle {
        if let Some(handle) = self.keywords.get(&keyword) {
            return *handle;
        }
        let class = match keyword {
            TypeKeyword::Any => TypeClass::Any,
            TypeKeyword::Unknown => TypeClass::Unknown,
            TypeKeyword::Object => TypeClass::Object,
            _ => TypeClass::Primitive,
        };
        let handle = self.graph.add_node(TypeNode::anonymous(class));
        self.graph.set_label(handle, keyword.as_str());
        self.keywords.insert(keyword, handle);
        handle
    }

    fn lower_reference(
        &mut self,
        reference: &TypeReference,
        scope: &Scope<'a>,
    ) -> Result<TypeHandle, GraphError> {
        let name = &reference.name.name;
        let (origin, arity) = match self.lookup(reference, scope)? {
            Found::TypeParameter(handle) => (handle, 0),
            Found::Declaration(key) => {
                let declared = match self.entries.get(&key) {
                    Some(Entry::Declared {
                        handle,
                        type_params,
                    }) => Some((*handle, type_params.len())),
                    Some(Entry::Alias { .. }) => None,
                    None => {
                        return Err(GraphError::UnresolvedType {
                            name: name.clone(),
                            span: to_source_span(reference.name.span),
                        });
                    }
                };
                match declared {
                    Some(declared) => declared,
                    None => (self.lower_alias(&key)?, 0),
                }
            }
        };

        // A bare generic name stands for its own declaration
        if reference.type_args.is_empty() {
            return Ok(origin);
        }
        if reference.type_args.len() != arity {
            return Err(GraphError::ArityMismatch {
                name: name.clone(),
                expected: arity,
                found: reference.type_args.len(),
                span: to_source_span(reference.span),
            });
        }

        let arguments = self.lower_all(&reference.type_args, scope)?;
        Ok(self.graph.add_node(TypeNode::reference(origin, arguments)))
    }

    fn lookup(&self, reference: &TypeReference, scope: &Scope<'a>) -> Result<Found, GraphError> {
        let name = &reference.name.name;
        let span = to_source_span(reference.name.span);

        if let Some(module) = &reference.module {
            if !self.modules.contains(module.as_str()) {
                return Err(GraphError::UnknownModule {
                    module: module.clone(),
                    span: to_source_span(reference.span),
                });
            }
            let key = (Some(module.clone()), name.clone());
            if self.entries.contains_key(&key) {
                return Ok(Found::Declaration(key));
            }
            return Err(GraphError::UnresolvedType {
                name: format!("{module:?}.{name}"),
                span,
            });
        }

        if let Some((_, handle)) = scope.type_params.iter().find(|(param, _)| param == name) {
            return Ok(Found::TypeParameter(*handle));
        }

        let local = scope.module.map(|module| (Some(module.to_string()), name.clone()));
        let top_level = (None, name.clone());
        for key in local.into_iter().chain(std::iter::once(top_level)) {
            if self.entries.contains_key(&key) {
                return Ok(Found::Declaration(key));
            }
        }

        let candidates: Vec<&DeclKey> = self
            .entries
            .keys()
            .filter(|(_, declared)| declared == name)
            .collect();
        match candidates.as_slice() {
            [] => Err(GraphError::UnresolvedType {
                name: name.clone(),
                span,
            }),
            [key] => Ok(Found::Declaration((*key).clone())),
            _ => Err(GraphError::AmbiguousType {
                name: name.clone(),
                candidates: candidates
                    .iter()
                    .map(|(module, name)| match module {
                        Some(module) => format!("{module:?}.{name}"),
                        None => name.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                span,
            }),
        }
    }

    fn lower_alias(&mut self, key: &DeclKey) -> Result<TypeHandle, GraphError> {
        if let Some(handle) = self.aliases.get(key) {
            return Ok(*handle);
        }
        let Some(Entry::Alias { decl, module }) = self.entries.get(key) else {
            return Err(GraphError::UnresolvedType {
                name: key.1.clone(),
                span: None,
            });
        };
        let (decl, module) = (*decl, *module);

        if self.alias_stack.contains(key) {
            return Err(GraphError::CircularAlias {
                name: decl.name.name.clone(),
                span: to_source_span(decl.name.span),
            });
        }

        self.alias_stack.push(key.clone());
        let lowered = self.lower_type(&decl.target, &Scope::module(module));
        self.alias_stack.pop();

        let handle = lowered?;
        self.aliases.insert(key.clone(), handle);
        self.graph.declare(module, decl.name.name.clone(), handle);
        Ok(handle)
    }

    // =========================================================================
    // Pass 3: call signatures
    // =========================================================================

    /// Interfaces inherit their bases' call signatures and instantiations
    /// report those of their generic origin.
    fn propagate_call_signatures(&mut self) {
        let handles: Vec<TypeHandle> = (0..self.graph.len()).map(TypeHandle::new).collect();

        let totals: Vec<(TypeHandle, usize)> = handles
            .iter()
            .filter(|handle| {
                self.graph
                    .node(**handle)
                    .is_some_and(|node| !node.is_reference() && !node.base_types.is_empty())
            })
            .map(|handle| (*handle, self.signature_total(*handle, &mut HashSet::new())))
            .collect();
        for (handle, total) in totals {
            if let Some(node) = self.graph.node_mut(handle) {
                node.call_signatures = total;
            }
        }

        let instantiations: Vec<(TypeHandle, usize)> = handles
            .iter()
            .filter_map(|handle| {
                let origin = self.graph.node(*handle)?.reference_target()?;
                Some((*handle, self.graph.node(origin)?.call_signatures))
            })
            .collect();
        for (handle, count) in instantiations {
            if let Some(node) = self.graph.node_mut(handle) {
                node.call_signatures = count;
            }
        }
    }

    fn signature_total(&self, handle: TypeHandle, visited: &mut HashSet<TypeHandle>) -> usize {
        if !visited.insert(handle) {
            return 0;
        }
        let Some(node) = self.graph.node(handle) else {
            return 0;
        };
        if let Some(origin) = node.reference_target() {
            return self.signature_total(origin, visited);
        }
        node.call_signatures
            + node
                .base_types
                .iter()
                .map(|base| self.signature_total(*base, visited))
                .sum::<usize>()
    }
}
