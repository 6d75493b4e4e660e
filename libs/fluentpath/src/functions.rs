//! Function registry for FluentPath functions
//!
//! The set of functions is closed: the parser resolves names against this
//! table, so an unknown name or a wrong argument count is a parse error.
//!
//! Uses a compile-time perfect hash map (phf) for O(1) function name lookups with zero runtime allocation.

use phf::phf_map;

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Empty,
    Where,
    Select,
    Distinct,
    Not,
}

impl FunctionKind {
    pub fn metadata(self) -> &'static FunctionMetadata {
        let name = match self {
            FunctionKind::Empty => "empty",
            FunctionKind::Where => "where",
            FunctionKind::Select => "select",
            FunctionKind::Distinct => "distinct",
            FunctionKind::Not => "not",
        };
        &FUNCTIONS_BY_NAME[name]
    }

    pub fn name(self) -> &'static str {
        self.metadata().name
    }

    /// Functions whose result is always a boolean or nothing
    pub fn is_predicate(self) -> bool {
        matches!(self, FunctionKind::Empty | FunctionKind::Not)
    }
}

/// Function metadata
#[derive(Debug, Clone, Copy)]
pub struct FunctionMetadata {
    pub kind: FunctionKind,
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    /// Arguments are re-evaluated once per focus item rather than once per call
    pub per_item_arguments: bool,
}

impl FunctionMetadata {
    pub fn accepts(&self, arg_count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&arg_count)
    }

    /// Arity description used in parse errors
    pub fn arity(&self) -> String {
        if self.min_args == self.max_args {
            match self.min_args {
                1 => "1 argument".to_string(),
                n => format!("{} arguments", n),
            }
        } else {
            format!("{} to {} arguments", self.min_args, self.max_args)
        }
    }
}

/// Static compile-time function registry using perfect hash map
static FUNCTIONS_BY_NAME: phf::Map<&'static str, FunctionMetadata> = phf_map! {
    // Existence
    "empty" => FunctionMetadata { kind: FunctionKind::Empty, name: "empty", min_args: 0, max_args: 0, per_item_arguments: false },
    "distinct" => FunctionMetadata { kind: FunctionKind::Distinct, name: "distinct", min_args: 0, max_args: 0, per_item_arguments: false },

    // Filtering and projection
    "where" => FunctionMetadata { kind: FunctionKind::Where, name: "where", min_args: 1, max_args: 1, per_item_arguments: true },
    "select" => FunctionMetadata { kind: FunctionKind::Select, name: "select", min_args: 1, max_args: 1, per_item_arguments: true },

    // Boolean logic
    "not" => FunctionMetadata { kind: FunctionKind::Not, name: "not", min_args: 0, max_args: 0, per_item_arguments: false },
};

/// Look up a function by name
pub fn lookup(name: &str) -> Option<&'static FunctionMetadata> {
    FUNCTIONS_BY_NAME.get(name)
}

/// All registered function names
pub fn names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS_BY_NAME.keys().copied()
}
