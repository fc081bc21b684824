//! Built-in formula functions
//!
//! The registry is the closed set of names the tokenizer recognizes as
//! functions. Names are matched case-insensitively.

pub mod date;
pub mod logical;
pub mod math;
pub mod text;

use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};
use ahash::AHashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Arguments are evaluated before the call and the argument count has already
/// been checked against the definition.
pub type FunctionImpl = fn(&[FormulaValue], &EvaluationContext) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
    /// Result depends on the clock rather than only on the arguments
    pub volatile: bool,
}

impl FunctionDef {
    /// Human-readable accepted argument count
    pub fn arity(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<&'static str, FunctionDef>,
}

static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Shared registry of built-in functions (lazily initialized)
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_math_functions();
        registry.register_date_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name.to_uppercase().as_str())
    }

    /// Whether a name is a built-in function
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the named function is volatile
    pub fn is_volatile(&self, name: &str) -> bool {
        self.get(name).map_or(false, |f| f.volatile)
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    fn register_fixed(&mut self, name: &'static str, args: usize, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: args,
            max_args: Some(args),
            implementation,
            volatile: false,
        });
    }

    fn register_variadic(&mut self, name: &'static str, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: 0,
            max_args: None,
            implementation,
            volatile: false,
        });
    }

    fn register_logical_functions(&mut self) {
        // IF: the else branch may be left out
        self.register(FunctionDef {
            name: "IF",
            min_args: 2,
            max_args: Some(3),
            implementation: logical::fn_if,
            volatile: false,
        });
        self.register_variadic("AND", logical::fn_and);
        self.register_variadic("OR", logical::fn_or);
        self.register_fixed("NOT", 1, logical::fn_not);
    }

    fn register_text_functions(&mut self) {
        self.register_variadic("CONCAT", text::fn_concat);
        self.register_fixed("UPPER", 1, text::fn_upper);
        self.register_fixed("LOWER", 1, text::fn_lower);
        self.register_fixed("LEN", 1, text::fn_len);
        self.register_fixed("TRIM", 1, text::fn_trim);
    }

    fn register_math_functions(&mut self) {
        self.register_variadic("SUM", math::fn_sum);
        self.register_fixed("ABS", 1, math::fn_abs);
        self.register_fixed("FLOOR", 1, math::fn_floor);
        self.register_fixed("CEIL", 1, math::fn_ceil);

        // ROUND: digits default to 0
        self.register(FunctionDef {
            name: "ROUND",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_round,
            volatile: false,
        });
    }

    fn register_date_functions(&mut self) {
        self.register(FunctionDef {
            name: "NOW",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_now,
            volatile: true,
        });
        self.register(FunctionDef {
            name: "TODAY",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_today,
            volatile: true,
        });
        self.register_fixed("DAYS", 2, date::fn_days);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Argument at `index`, or null when absent
pub(crate) fn arg(args: &[FormulaValue], index: usize) -> &FormulaValue {
    static NULL: FormulaValue = FormulaValue::Null;
    args.get(index).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_closed_set() {
        assert_eq!(
            function_registry().names(),
            vec![
                "ABS", "AND", "CEIL", "CONCAT", "DAYS", "FLOOR", "IF", "LEN", "LOWER", "NOT",
                "NOW", "OR", "ROUND", "SUM", "TODAY", "TRIM", "UPPER",
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(function_registry().contains("concat"));
        assert!(function_registry().contains("Days"));
        assert!(!function_registry().contains("AVERAGE"));
    }

    #[test]
    fn test_volatile() {
        assert!(function_registry().is_volatile("NOW"));
        assert!(function_registry().is_volatile("today"));
        assert!(!function_registry().is_volatile("DAYS"));
    }

    #[test]
    fn test_arity_text() {
        let registry = function_registry();
        assert_eq!(registry.get("NOT").unwrap().arity(), "1");
        assert_eq!(registry.get("IF").unwrap().arity(), "2 to 3");
        assert_eq!(registry.get("SUM").unwrap().arity(), "at least 0");
    }
}
