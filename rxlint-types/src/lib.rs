//! rxlint type oracle
//!
//! Structural "could-be" queries over a host's static type graph, used by lint
//! rules that must recognise reactive-stream types (`Observable`, `Subject`,
//! `Subscription`, ...) without being able to prove what a type is.

// Allow clippy lints for development
#![allow(clippy::uninlined_format_args)]
//!
//! ## Architecture
//!
//! - **Accessor**: [`TypeGraphAccessor`] is the only way the oracle reads host
//!   type information; it never owns or mutates nodes
//! - **Matcher**: [`StructuralMatcher`] walks references, unions, intersections,
//!   base types and `implements` clauses looking for a named symbol
//! - **Façade**: [`TypeServices`] exposes the well-known predicates lint rules
//!   call, with an optional per-pass memo table
//! - **Reference host**: [`TypeGraph`] lowers declaration fixtures into an
//!   owned graph so the oracle can be exercised without a real type checker

pub mod accessor;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod predicates;
pub mod services;
pub mod target;
pub mod types;

// Re-export public API
pub use accessor::TypeGraphAccessor;
pub use cache::{CacheStats, MatchCache};
pub use config::{OracleConfig, DEFAULT_FUNCTION_WRAPPERS, DEFAULT_MAX_DEPTH};
pub use error::{GraphError, TargetError};
pub use graph::{BindingInfo, EdgeKind, TypeGraph};
pub use matcher::StructuralMatcher;
pub use services::{TypeServices, WellKnown, RXJS_QUALIFIER};
pub use target::{NamePattern, TargetDescriptor, TargetKey};
pub use types::{
    ClassHeritage, Composition, HeritageClause, Symbol, TypeClass, TypeHandle, TypeNode,
};

/// Parse a declaration fixture and lower it into a [`TypeGraph`]
pub fn load_type_graph(source: &str) -> miette::Result<TypeGraph> {
    let file = rxlint_decl::parse_declarations(source)?;
    Ok(TypeGraph::from_declarations(&file)?)
}

#[cfg(test)]
mod tests;
