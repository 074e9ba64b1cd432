//! Target descriptors: what the oracle is asked to look for

use crate::error::TargetError;
use regex::Regex;
use std::fmt;

/// Name test applied to symbol names and heritage identifiers
#[derive(Debug, Clone)]
pub enum NamePattern {
    Exact(String),
    Pattern(Regex),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(expected) => expected == name,
            NamePattern::Pattern(pattern) => pattern.is_match(name),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Exact(name) => f.write_str(name),
            NamePattern::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// Name (exact or pattern) plus an optional declaring-module qualifier
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub name: NamePattern,
    pub qualifier: Option<Regex>,
}

impl TargetDescriptor {
    /// Match a symbol name exactly
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: NamePattern::Exact(name.into()),
            qualifier: None,
        }
    }

    /// Match symbol names against a regular expression
    pub fn pattern(pattern: &str) -> Result<Self, TargetError> {
        let regex = compile(pattern)?;
        Ok(Self {
            name: NamePattern::Pattern(regex),
            qualifier: None,
        })
    }

    /// Require the declaring module to match `qualifier`
    pub fn qualified(self, qualifier: &str) -> Result<Self, TargetError> {
        Ok(self.with_qualifier(compile(qualifier)?))
    }

    pub fn with_qualifier(mut self, qualifier: Regex) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Name test only; the qualifier is checked separately
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.matches(name)
    }

    /// Qualifier test against a declaring-module path
    ///
    /// Without a qualifier every module (including none) is accepted. With one,
    /// a symbol that has no module never matches.
    pub fn matches_module(&self, module: Option<&str>) -> bool {
        match (&self.qualifier, module) {
            (None, _) => true,
            (Some(qualifier), Some(module)) => qualifier.is_match(module),
            (Some(_), None) => false,
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    /// Hashable identity used by the per-pass memo table
    pub fn key(&self) -> TargetKey {
        let name = match &self.name {
            NamePattern::Exact(name) => format!("={name}"),
            NamePattern::Pattern(pattern) => format!("~{}", pattern.as_str()),
        };
        TargetKey {
            name,
            qualifier: self.qualifier.as_ref().map(|q| q.as_str().to_string()),
        }
    }
}

impl From<&str> for TargetDescriptor {
    fn from(name: &str) -> Self {
        Self::exact(name)
    }
}

impl From<String> for TargetDescriptor {
    fn from(name: String) -> Self {
        Self::exact(name)
    }
}

impl From<&TargetDescriptor> for TargetDescriptor {
    fn from(target: &TargetDescriptor) -> Self {
        target.clone()
    }
}

impl From<Regex> for TargetDescriptor {
    fn from(pattern: Regex) -> Self {
        Self {
            name: NamePattern::Pattern(pattern),
            qualifier: None,
        }
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, " in /{}/", qualifier.as_str())?;
        }
        Ok(())
    }
}

/// Identity of a [`TargetDescriptor`] for hashing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetKey {
    name: String,
    qualifier: Option<String>,
}

fn compile(pattern: &str) -> Result<Regex, TargetError> {
    Regex::new(pattern).map_err(|source| TargetError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
