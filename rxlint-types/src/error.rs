//! Error types for rxlint-types
//!
//! The oracle itself never fails: missing type information is "could not be".
//! Errors only arise while building its inputs, either a target descriptor
//! from user-supplied patterns or a reference graph from a declaration fixture.

use miette::{Diagnostic, SourceSpan};
use rxlint_decl::Span;
use thiserror::Error;

/// Invalid target descriptor input
#[derive(Error, Diagnostic, Debug)]
pub enum TargetError {
    #[error("Invalid pattern `{pattern}`")]
    #[diagnostic(
        code(rxlint::target::invalid_pattern),
        help("Name and qualifier patterns use regular expression syntax")
    )]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown predicate `{name}`")]
    #[diagnostic(
        code(rxlint::target::unknown_predicate),
        help("Available predicates: {available}")
    )]
    UnknownPredicate { name: String, available: String },
}

/// Errors lowering a declaration fixture into a [`TypeGraph`](crate::graph::TypeGraph)
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Cannot find type `{name}`")]
    #[diagnostic(
        code(rxlint::graph::unresolved_type),
        help("Declare it with `class`, `interface` or `type`, or qualify it as \"module\".{name}")
    )]
    UnresolvedType {
        name: String,
        #[label("not declared")]
        span: Option<SourceSpan>,
    },

    #[error("Type `{name}` is declared in several modules")]
    #[diagnostic(
        code(rxlint::graph::ambiguous_type),
        help("Qualify the reference with one of: {candidates}")
    )]
    AmbiguousType {
        name: String,
        candidates: String,
        #[label("ambiguous reference")]
        span: Option<SourceSpan>,
    },

    #[error("Unknown module \"{module}\"")]
    #[diagnostic(code(rxlint::graph::unknown_module))]
    UnknownModule {
        module: String,
        #[label("no such module")]
        span: Option<SourceSpan>,
    },

    #[error("Duplicate declaration of `{name}`")]
    #[diagnostic(
        code(rxlint::graph::duplicate_declaration),
        help("Each module may declare a name only once")
    )]
    DuplicateDeclaration {
        name: String,
        #[label("declared again here")]
        span: Option<SourceSpan>,
    },

    #[error("Duplicate binding `{name}`")]
    #[diagnostic(code(rxlint::graph::duplicate_binding))]
    DuplicateBinding {
        name: String,
        #[label("bound again here")]
        span: Option<SourceSpan>,
    },

    #[error("`{name}` expects {expected} type arguments, found {found}")]
    #[diagnostic(
        code(rxlint::graph::arity_mismatch),
        help("Ensure all generic type arguments are provided correctly")
    )]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        #[label("expected {expected} arguments, found {found}")]
        span: Option<SourceSpan>,
    },

    #[error("Type alias `{name}` refers to itself")]
    #[diagnostic(code(rxlint::graph::circular_alias))]
    CircularAlias {
        name: String,
        #[label("alias cycle starts here")]
        span: Option<SourceSpan>,
    },
}

/// Convert an AST span into a miette source span
pub fn to_source_span(span: Span) -> Option<SourceSpan> {
    Some(span.to_source_span())
}
