//! Main FluentPath engine
//!
//! Orchestrates the pipeline: Lex → Parse → AST → Evaluation → Outcome.
//! Parsed expressions are cached by source text, so an invariant is parsed
//! once and evaluated against many records.

use crate::ast::AstNode;
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator;
use crate::lexer::tokenize;
use crate::parser::{self, Parser};
use crate::value::{Collection, Value};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// A parsed expression, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: AstNode,
}

impl Expression {
    /// Parse without going through an engine cache
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            root: parser::parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &AstNode {
        &self.root
    }

    /// Whether the expression is a boolean-valued operator or function
    pub fn is_predicate(&self) -> bool {
        self.root.is_predicate()
    }
}

/// Top-level evaluation result
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A single item, unwrapped from its collection
    Value(Value),
    /// Zero or several items, in order
    List(Collection),
}

impl Outcome {
    /// Unwrap a result collection.
    ///
    /// An empty predicate result reads as `true`: the rule does not apply to
    /// the record, so the record satisfies it.
    pub fn from_collection(collection: Collection, predicate: bool) -> Self {
        if let Some(item) = collection.as_singleton() {
            return Outcome::Value(item.clone());
        }
        if collection.is_empty() && predicate {
            return Outcome::Value(Value::boolean(true));
        }
        Outcome::List(collection)
    }

    /// The bare boolean, if the outcome is one
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Outcome::Value(value) => value.as_bool(),
            Outcome::List(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Outcome::List(_))
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Outcome::Value(value) => value.to_json(),
            Outcome::List(collection) => collection.to_json(),
        }
    }
}

/// Main FluentPath engine
///
/// Cloning an engine is cheap and the clones share one parse cache.
#[derive(Clone)]
pub struct Engine {
    environment: Environment,
    cache: Arc<Mutex<LruCache<String, Arc<Expression>>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the built-in environment and the default cache size
    pub fn new() -> Self {
        Self {
            environment: Environment::builtin(),
            cache: Arc::new(Mutex::new(LruCache::new(cache_capacity(
                DEFAULT_CACHE_CAPACITY,
            )))),
        }
    }

    /// Replace the environment used for every evaluation
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Replace the parse cache with an empty one holding up to `capacity` expressions
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = Arc::new(Mutex::new(LruCache::new(cache_capacity(capacity))));
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Number of expressions currently cached
    pub fn cached_expressions(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // ============================================================================
    // Compilation
    // ============================================================================

    /// Parse an expression, reusing a cached parse for the same source text
    pub fn compile(&self, source: &str) -> Result<Arc<Expression>> {
        // Check cache first
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(expression) = cache.get(source) {
                tracing::trace!(expression = source, "Expression cache hit");
                return Ok(Arc::clone(expression));
            }
        }

        let tokens = tokenize(source)?;
        let token_count = tokens.len();
        let root = Parser::new(tokens).parse()?;
        tracing::debug!(
            expression = source,
            tokens = token_count,
            nodes = root.node_count(),
            "Compiled expression"
        );

        let expression = Arc::new(Expression {
            source: source.to_string(),
            root,
        });

        // Cache the expression
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.put(source.to_string(), Arc::clone(&expression));
        }

        Ok(expression)
    }

    // ============================================================================
    // Evaluation
    // ============================================================================

    /// Evaluate an expression against a record and unwrap the result
    pub fn evaluate(&self, source: &str, record: &Value) -> Result<Outcome> {
        let expression = self.compile(source)?;
        let collection = self.evaluate_collection(&expression, record)?;
        Ok(Outcome::from_collection(
            collection,
            expression.is_predicate(),
        ))
    }

    /// Evaluate against a JSON document
    pub fn evaluate_json(&self, source: &str, record: &serde_json::Value) -> Result<Outcome> {
        let expression = self.compile(source)?;
        let collection = self.evaluate_focus(&expression, Collection::from_json(record))?;
        Ok(Outcome::from_collection(
            collection,
            expression.is_predicate(),
        ))
    }

    /// Evaluate a compiled expression and return the raw result collection
    pub fn evaluate_collection(&self, expression: &Expression, record: &Value) -> Result<Collection> {
        self.evaluate_focus(expression, Collection::singleton(record.clone()))
    }

    /// `%resource` is bound when the focus is a single record; `$context`
    /// starts out as the focus itself.
    fn evaluate_focus(&self, expression: &Expression, focus: Collection) -> Result<Collection> {
        let environment = match focus.as_singleton() {
            Some(record) => self.environment.with_resource(record.clone()),
            None => self.environment.clone(),
        };

        match evaluator::evaluate(expression.root(), &focus, &environment) {
            Ok(result) => {
                tracing::trace!(
                    expression = expression.source(),
                    items = result.len(),
                    "Evaluated expression"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::debug!(
                    expression = expression.source(),
                    error = %e,
                    "Evaluation failed"
                );
                Err(e)
            }
        }
    }
}

fn cache_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
