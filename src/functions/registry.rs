use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Definition of a function the numeric backends can evaluate
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "re")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation over complex doubles; `None` signals a domain error
    pub eval: fn(&[Complex64]) -> Option<Complex64>,
}

impl std::fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = crate::functions::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len() + 1, Default::default());
    for def in defs {
        map.insert(def.name, def);
    }
    // `log` is the natural logarithm
    if let Some(ln) = map.get("ln").cloned() {
        map.insert("log", ln);
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }
}
