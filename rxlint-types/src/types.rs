//! Type node model shared by the oracle and its hosts
//!
//! A host type checker owns every node; the oracle only borrows them through
//! [`TypeGraphAccessor`](crate::accessor::TypeGraphAccessor). The composition
//! kind is a sum type rather than a set of flags, so a node is exactly one of
//! plain, generic reference, union or intersection.

use std::fmt;

/// Opaque handle of one type node in a host graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declared name of a type together with the module that declares it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    /// Declaring-module path, `None` for global declarations
    pub module: Option<String>,
}

impl Symbol {
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
        }
    }

    pub fn in_module(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
        }
    }

    /// `"module".Name` for module members, the bare name otherwise
    pub fn fully_qualified_name(&self) -> String {
        match &self.module {
            Some(module) => format!("{module:?}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name())
    }
}

/// Coarse classification of a node as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Fully dynamic (`any`)
    Any,
    /// Top, unconstrained (`unknown`)
    Unknown,
    Primitive,
    Object,
    TypeParameter,
}

/// How a node is composed from other nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    Plain,
    /// Generic instantiation of `target` with ordered type arguments
    Reference {
        target: TypeHandle,
        type_arguments: Vec<TypeHandle>,
    },
    Union(Vec<TypeHandle>),
    Intersection(Vec<TypeHandle>),
}

impl Composition {
    /// Members of a union or intersection, empty for other kinds
    pub fn members(&self) -> &[TypeHandle] {
        match self {
            Composition::Union(members) | Composition::Intersection(members) => members,
            Composition::Plain | Composition::Reference { .. } => &[],
        }
    }
}

/// One identifier from a class's `implements` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeritageClause {
    /// The identifier as written
    pub text: String,
    /// Declared type of the identifier, when the host could resolve it
    pub resolved: Option<TypeHandle>,
}

impl HeritageClause {
    pub fn new(text: impl Into<String>, resolved: Option<TypeHandle>) -> Self {
        Self {
            text: text.into(),
            resolved,
        }
    }
}

/// Syntactic heritage of a class-like declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassHeritage {
    pub implements: Vec<HeritageClause>,
}

/// One resolved type in the host graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub symbol: Option<Symbol>,
    pub class: TypeClass,
    pub composition: Composition,
    /// Direct supertypes
    pub base_types: Vec<TypeHandle>,
    /// Number of invokable signatures, including inherited ones
    pub call_signatures: usize,
    /// Present only when the originating declaration is class-like
    pub heritage: Option<ClassHeritage>,
}

impl TypeNode {
    /// A symbol-less node of the given class
    pub fn anonymous(class: TypeClass) -> Self {
        Self {
            symbol: None,
            class,
            composition: Composition::Plain,
            base_types: Vec::new(),
            call_signatures: 0,
            heritage: None,
        }
    }

    /// A named object type
    pub fn object(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            ..Self::anonymous(TypeClass::Object)
        }
    }

    pub fn union(members: Vec<TypeHandle>) -> Self {
        Self {
            composition: Composition::Union(members),
            ..Self::anonymous(TypeClass::Object)
        }
    }

    pub fn intersection(members: Vec<TypeHandle>) -> Self {
        Self {
            composition: Composition::Intersection(members),
            ..Self::anonymous(TypeClass::Object)
        }
    }

    /// Generic instantiation of `target`
    pub fn reference(target: TypeHandle, type_arguments: Vec<TypeHandle>) -> Self {
        Self {
            composition: Composition::Reference {
                target,
                type_arguments,
            },
            ..Self::anonymous(TypeClass::Object)
        }
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_base_types(mut self, base_types: Vec<TypeHandle>) -> Self {
        self.base_types = base_types;
        self
    }

    pub fn with_call_signatures(mut self, count: usize) -> Self {
        self.call_signatures = count;
        self
    }

    pub fn with_heritage(mut self, implements: Vec<HeritageClause>) -> Self {
        self.heritage = Some(ClassHeritage { implements });
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.symbol.as_ref().map(|symbol| symbol.name.as_str())
    }

    pub fn module(&self) -> Option<&str> {
        self.symbol.as_ref().and_then(|symbol| symbol.module.as_deref())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.composition, Composition::Reference { .. })
    }

    pub fn reference_target(&self) -> Option<TypeHandle> {
        match &self.composition {
            Composition::Reference { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Implemented interfaces when the node comes from a class-like declaration
    pub fn implemented(&self) -> &[HeritageClause] {
        self.heritage
            .as_ref()
            .map(|heritage| heritage.implements.as_slice())
            .unwrap_or_default()
    }
}
