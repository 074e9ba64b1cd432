//! Oracle configuration

/// Default recursion bound for a single could-be traversal
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Names that mark a type as a function wrapper even without call signatures
pub const DEFAULT_FUNCTION_WRAPPERS: &[&str] = &["Function", "ArrowFunction", "__function"];

/// Tuning knobs for the matcher and the type service façade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Deepest nesting a traversal follows before giving up on that path
    pub max_depth: usize,
    /// Memoize top-level results for the lifetime of one [`TypeServices`](crate::TypeServices)
    pub memoize: bool,
    /// Nominal function-wrapper names consulted by `could_be_function`
    pub function_wrappers: Vec<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            memoize: true,
            function_wrappers: DEFAULT_FUNCTION_WRAPPERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl OracleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_function_wrappers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function_wrappers = names.into_iter().map(Into::into).collect();
        self
    }
}
