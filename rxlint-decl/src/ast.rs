// rxlint Declaration AST
// Syntax tree for type declaration fixtures with source preservation

use std::fmt;

/// Source position information for AST nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to a miette source span for diagnostics
    pub fn to_source_span(&self) -> miette::SourceSpan {
        miette::SourceSpan::new(self.start.into(), self.len())
    }
}

/// A complete declaration fixture
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationFile {
    pub items: Vec<Item>,
    pub source_file: Option<String>,
    pub span: Span,
}

impl DeclarationFile {
    /// Iterate over every declaration, paired with the module path that encloses it
    pub fn declarations(&self) -> impl Iterator<Item = (Option<&str>, &Declaration)> {
        self.items.iter().flat_map(|item| -> Box<dyn Iterator<Item = _> + '_> {
            match &item.kind {
                ItemKind::Module(module) => Box::new(
                    module
                        .declarations
                        .iter()
                        .map(move |decl| (Some(module.path.as_str()), decl)),
                ),
                ItemKind::Declaration(decl) => Box::new(std::iter::once((None, decl))),
                ItemKind::Binding(_) => Box::new(std::iter::empty()),
            }
        })
    }

    /// Iterate over every top-level binding in source order
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Binding(binding) => Some(binding),
            _ => None,
        })
    }
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Module(ModuleBlock),
    Declaration(Declaration),
    Binding(Binding),
}

/// `module "path" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBlock {
    pub path: String,
    pub path_span: Span,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

/// Identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Alias(AliasDeclaration),
}

impl Declaration {
    pub fn name(&self) -> &Identifier {
        match self {
            Declaration::Class(class) => &class.name,
            Declaration::Interface(interface) => &interface.name,
            Declaration::Alias(alias) => &alias.name,
        }
    }

    pub fn type_params(&self) -> &[Identifier] {
        match self {
            Declaration::Class(class) => &class.type_params,
            Declaration::Interface(interface) => &interface.type_params,
            Declaration::Alias(_) => &[],
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Class(class) => class.span,
            Declaration::Interface(interface) => interface.span,
            Declaration::Alias(alias) => alias.span,
        }
    }
}

/// `class Name<T> extends Base<T> implements A, B;`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub name: Identifier,
    pub type_params: Vec<Identifier>,
    pub extends: Option<TypeReference>,
    pub implements: Vec<TypeReference>,
    pub span: Span,
}

/// `interface Name<T> extends A, B { (x: T): R; }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub name: Identifier,
    pub type_params: Vec<Identifier>,
    pub extends: Vec<TypeReference>,
    pub call_signatures: Vec<CallSignature>,
    pub span: Span,
}

/// Call signature inside an interface body
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    pub params: Vec<Parameter>,
    pub return_type: TypeExpr,
    pub span: Span,
}

/// `type Name = T;`
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDeclaration {
    pub name: Identifier,
    pub target: TypeExpr,
    pub span: Span,
}

/// A named program location
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Let(LetBinding),
    Fn(FnBinding),
}

impl Binding {
    pub fn name(&self) -> &Identifier {
        match self {
            Binding::Let(binding) => &binding.name,
            Binding::Fn(binding) => &binding.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Binding::Let(binding) => binding.span,
            Binding::Fn(binding) => binding.span,
        }
    }
}

/// `let name: T;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub name: Identifier,
    pub type_annotation: TypeExpr,
    pub span: Span,
}

/// `fn name(params): Declared => Inferred;`
///
/// Both the declared return annotation and the inferred body type are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct FnBinding {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub return_annotation: Option<TypeExpr>,
    pub inferred_body: Option<TypeExpr>,
    pub span: Span,
}

/// Parameter with type annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub type_annotation: TypeExpr,
    pub span: Span,
}

/// Type expression
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword {
        keyword: TypeKeyword,
        span: Span,
    },
    Reference(TypeReference),
    Function {
        params: Vec<Parameter>,
        return_type: Box<TypeExpr>,
        span: Span,
    },
    Union {
        members: Vec<TypeExpr>,
        span: Span,
    },
    Intersection {
        members: Vec<TypeExpr>,
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Keyword { span, .. }
            | TypeExpr::Function { span, .. }
            | TypeExpr::Union { span, .. }
            | TypeExpr::Intersection { span, .. } => *span,
            TypeExpr::Reference(reference) => reference.span,
        }
    }
}

/// Named type reference: `Name`, `Name<Args>`, `"module".Name<Args>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    pub module: Option<String>,
    pub name: Identifier,
    pub type_args: Vec<TypeExpr>,
    pub span: Span,
}

/// Built-in type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    Void,
    Never,
    Null,
    Undefined,
    Object,
}

impl TypeKeyword {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "any" => Some(TypeKeyword::Any),
            "unknown" => Some(TypeKeyword::Unknown),
            "string" => Some(TypeKeyword::String),
            "number" => Some(TypeKeyword::Number),
            "boolean" => Some(TypeKeyword::Boolean),
            "void" => Some(TypeKeyword::Void),
            "never" => Some(TypeKeyword::Never),
            "null" => Some(TypeKeyword::Null),
            "undefined" => Some(TypeKeyword::Undefined),
            "object" => Some(TypeKeyword::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Any => "any",
            TypeKeyword::Unknown => "unknown",
            TypeKeyword::String => "string",
            TypeKeyword::Number => "number",
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::Void => "void",
            TypeKeyword::Never => "never",
            TypeKeyword::Null => "null",
            TypeKeyword::Undefined => "undefined",
            TypeKeyword::Object => "object",
        }
    }
}

impl fmt::Display for TypeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_annotation)
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{module:?}.")?;
        }
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.type_args, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword { keyword, .. } => write!(f, "{keyword}"),
            TypeExpr::Reference(reference) => write!(f, "{reference}"),
            TypeExpr::Function {
                params,
                return_type,
                ..
            } => {
                f.write_str("(")?;
                write_joined(f, params, ", ")?;
                write!(f, ") => {return_type}")
            }
            TypeExpr::Union { members, .. } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if matches!(member, TypeExpr::Function { .. }) {
                        write!(f, "({member})")?;
                    } else {
                        write!(f, "{member}")?;
                    }
                }
                Ok(())
            }
            TypeExpr::Intersection { members, .. } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    // Unions bind looser than intersections
                    if matches!(member, TypeExpr::Union { .. }) {
                        write!(f, "({member})")?;
                    } else {
                        write!(f, "{member}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
