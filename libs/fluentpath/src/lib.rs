//! FluentPath Engine - invariant expressions over schema-less records
//!
//! This crate evaluates FluentPath expressions against nested records
//! (mappings, ordered lists, scalars, dates) with collection semantics and
//! three-valued boolean logic:
//! 1. **Lexer** → tokens
//! 2. **Parser** → AST (Abstract Syntax Tree)
//! 3. **Evaluator** → result collection
//!
//! # Architecture Overview
//!
//! ```text
//! Expression String
//!      |
//!   Lexer -> Tokens
//!      |
//!   Parser -> AST (cached by the Engine)
//!      |
//!   Evaluator(AST, focus = [record], Environment) -> Collection
//!      |
//!   Outcome (bare value or ordered list)
//! ```
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//!
//! let record = json!({"code": "kg", "system": "http://unitsofmeasure.org", "value": 300});
//! let outcome = ferrum_fluentpath::evaluate(
//!     "(code or value.empty()) and (system.empty() or system = %ucum)",
//!     &record,
//! )?;
//! assert_eq!(outcome.as_boolean(), Some(true));
//! # Ok::<(), ferrum_fluentpath::Error>(())
//! ```

pub mod ast;
pub mod engine;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod logic;
pub mod operations;
pub mod parser;
pub mod temporal;
pub mod token;
pub mod value;

// Re-export main types
pub use ast::AstNode;
pub use engine::{Engine, Expression, Outcome};
pub use environment::Environment;
pub use error::{Error, EvalError, LexError, ParseError, Result};
pub use lexer::tokenize;
pub use logic::ThreeValuedBoolean;
pub use parser::parse;
pub use value::{Collection, Value};

/// Evaluate `expression` against a JSON record with the built-in environment
pub fn evaluate(expression: &str, record: &serde_json::Value) -> Result<Outcome> {
    Engine::new().evaluate_json(expression, record)
}
