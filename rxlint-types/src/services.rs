//! Type service façade
//!
//! The surface lint rules use: a fixed battery of predicates for the
//! reactive library's well-known types, plus generic entry points for ad hoc
//! targets. Every predicate is a pure query; a location without type
//! information answers `false`.

use crate::accessor::TypeGraphAccessor;
use crate::cache::{CacheStats, MatchCache};
use crate::config::OracleConfig;
use crate::error::TargetError;
use crate::matcher::StructuralMatcher;
use crate::predicates;
use crate::target::TargetDescriptor;
use crate::types::{TypeHandle, TypeNode};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

lazy_static! {
    /// Declaring-module pattern of the reactive library itself
    pub static ref RXJS_QUALIFIER: Regex =
        Regex::new(r"(^|[/\\])rxjs([/\\]|$)").expect("rxjs qualifier is a valid regex");
}

/// Named predicates exposed by [`TypeServices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    Observable,
    Subject,
    BehaviorSubject,
    Subscription,
    Error,
    MonoTypeOperatorFunction,
    Function,
    ReturnsObservable,
    Any,
    Unknown,
    ReferenceType,
}

impl WellKnown {
    pub const ALL: [WellKnown; 11] = [
        WellKnown::Observable,
        WellKnown::Subject,
        WellKnown::BehaviorSubject,
        WellKnown::Subscription,
        WellKnown::Error,
        WellKnown::MonoTypeOperatorFunction,
        WellKnown::Function,
        WellKnown::ReturnsObservable,
        WellKnown::Any,
        WellKnown::Unknown,
        WellKnown::ReferenceType,
    ];

    /// Predicate name as rules and the CLI refer to it
    pub fn as_str(&self) -> &'static str {
        match self {
            WellKnown::Observable => "observable",
            WellKnown::Subject => "subject",
            WellKnown::BehaviorSubject => "behavior-subject",
            WellKnown::Subscription => "subscription",
            WellKnown::Error => "error",
            WellKnown::MonoTypeOperatorFunction => "mono-type-operator-function",
            WellKnown::Function => "function",
            WellKnown::ReturnsObservable => "returns-observable",
            WellKnown::Any => "any",
            WellKnown::Unknown => "unknown",
            WellKnown::ReferenceType => "reference-type",
        }
    }

    /// Symbol name the predicate looks for, if it is a plain could-be check
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            WellKnown::Observable | WellKnown::ReturnsObservable => Some("Observable"),
            WellKnown::Subject => Some("Subject"),
            WellKnown::BehaviorSubject => Some("BehaviorSubject"),
            WellKnown::Subscription => Some("Subscription"),
            WellKnown::Error => Some("Error"),
            WellKnown::MonoTypeOperatorFunction => Some("MonoTypeOperatorFunction"),
            WellKnown::Function | WellKnown::Any | WellKnown::Unknown | WellKnown::ReferenceType => {
                None
            }
        }
    }
}

impl fmt::Display for WellKnown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellKnown {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        WellKnown::ALL
            .into_iter()
            .find(|known| known.as_str() == wanted)
            .ok_or_else(|| TargetError::UnknownPredicate {
                name: s.to_string(),
                available: WellKnown::ALL.map(|known| known.as_str()).join(", "),
            })
    }
}

/// Predicates over one host type graph, for one analysis pass
pub struct TypeServices<'g, G: TypeGraphAccessor + ?Sized> {
    matcher: StructuralMatcher<'g, G>,
    config: OracleConfig,
    cache: Option<MatchCache>,
}

impl<'g, G: TypeGraphAccessor + ?Sized> TypeServices<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::with_config(graph, OracleConfig::default())
    }

    pub fn with_config(graph: &'g G, config: OracleConfig) -> Self {
        let cache = config.memoize.then(MatchCache::new);
        Self {
            matcher: StructuralMatcher::with_max_depth(graph, config.max_depth),
            config,
            cache,
        }
    }

    pub fn graph(&self) -> &'g G {
        self.matcher.graph()
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn matcher(&self) -> &StructuralMatcher<'g, G> {
        &self.matcher
    }

    /// Memo table counters, `None` when memoization is off
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(MatchCache::stats)
    }

    // =========================================================================
    // Raw access
    // =========================================================================

    pub fn get_type(&self, location: &G::Location) -> Option<TypeHandle> {
        let handle = self.graph().resolve_type(location);
        if handle.is_none() {
            debug!("no type information for location");
        }
        handle
    }

    pub fn node(&self, handle: TypeHandle) -> Option<&'g TypeNode> {
        self.graph().node(handle)
    }

    // =========================================================================
    // Generic entry points
    // =========================================================================

    pub fn could_be_type(
        &self,
        location: &G::Location,
        target: impl Into<TargetDescriptor>,
    ) -> bool {
        match self.get_type(location) {
            Some(handle) => self.could_be_type_of(handle, &target.into()),
            None => false,
        }
    }

    /// Could-be check on an already resolved handle, memoized when enabled
    pub fn could_be_type_of(&self, handle: TypeHandle, target: &TargetDescriptor) -> bool {
        match &self.cache {
            Some(cache) => cache.get_or_compute(handle, target.key(), || {
                self.matcher.could_be_type(handle, target)
            }),
            None => self.matcher.could_be_type(handle, target),
        }
    }

    /// Function-like locations are callable without consulting their type
    pub fn could_be_function(&self, location: &G::Location) -> bool {
        if self.graph().is_function_like(location) {
            return true;
        }
        match self.get_type(location) {
            Some(handle) => self.could_be_function_type(handle),
            None => false,
        }
    }

    pub fn could_be_function_type(&self, handle: TypeHandle) -> bool {
        predicates::could_be_function(&self.matcher, handle, &self.config.function_wrappers)
    }

    pub fn could_return_type(
        &self,
        location: &G::Location,
        target: impl Into<TargetDescriptor>,
    ) -> bool {
        predicates::could_return_type(&self.matcher, location, &target.into())
    }

    pub fn is_any(&self, location: &G::Location) -> bool {
        self.get_type(location)
            .is_some_and(|handle| predicates::is_any(self.graph(), handle))
    }

    pub fn is_unknown(&self, location: &G::Location) -> bool {
        self.get_type(location)
            .is_some_and(|handle| predicates::is_unknown(self.graph(), handle))
    }

    pub fn is_reference_type(&self, location: &G::Location) -> bool {
        self.get_type(location)
            .is_some_and(|handle| predicates::is_reference_type(self.graph(), handle))
    }

    // =========================================================================
    // Well-known reactive types
    // =========================================================================

    pub fn could_be_observable(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "Observable")
    }

    pub fn could_be_subject(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "Subject")
    }

    pub fn could_be_behavior_subject(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "BehaviorSubject")
    }

    pub fn could_be_subscription(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "Subscription")
    }

    pub fn could_be_error(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "Error")
    }

    pub fn could_be_mono_type_operator_function(&self, location: &G::Location) -> bool {
        self.could_be_type(location, "MonoTypeOperatorFunction")
    }

    pub fn could_return_observable(&self, location: &G::Location) -> bool {
        self.could_return_type(location, "Observable")
    }

    /// Like `could_be_type`, restricted to symbols declared by the reactive library
    pub fn could_be_rxjs_type(&self, location: &G::Location, name: &str) -> bool {
        let target = TargetDescriptor::exact(name).with_qualifier(RXJS_QUALIFIER.clone());
        self.could_be_type(location, target)
    }

    /// Evaluate a named predicate
    pub fn check(&self, location: &G::Location, predicate: WellKnown) -> bool {
        match predicate {
            WellKnown::Observable => self.could_be_observable(location),
            WellKnown::Subject => self.could_be_subject(location),
            WellKnown::BehaviorSubject => self.could_be_behavior_subject(location),
            WellKnown::Subscription => self.could_be_subscription(location),
            WellKnown::Error => self.could_be_error(location),
            WellKnown::MonoTypeOperatorFunction => {
                self.could_be_mono_type_operator_function(location)
            }
            WellKnown::Function => self.could_be_function(location),
            WellKnown::ReturnsObservable => self.could_return_observable(location),
            WellKnown::Any => self.is_any(location),
            WellKnown::Unknown => self.is_unknown(location),
            WellKnown::ReferenceType => self.is_reference_type(location),
        }
    }
}
