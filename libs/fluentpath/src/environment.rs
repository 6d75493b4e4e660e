//! Evaluation environment for FluentPath expressions
//!
//! The environment carries the external constants (`%name`), the record under
//! evaluation (`%resource`) and the captured context item (`$context`). It is
//! never mutated in place: every builder returns a new environment sharing
//! the constant table until it diverges.

use crate::value::{Collection, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Canonical unit-system identifier bound to `%ucum`
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";
/// Bound to `%sct`
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";
/// Bound to `%loinc`
pub const LOINC_SYSTEM: &str = "http://loinc.org";

const RESOURCE: &str = "resource";

/// External constants plus the captured context item
#[derive(Clone, Debug, Default)]
pub struct Environment {
    /// Constant table keyed by name without the leading `%`
    constants: Arc<HashMap<Arc<str>, Value>>,
    /// Record bound per call as `%resource`; shadows a table entry of that name
    resource: Option<Value>,
    /// Focus captured on entry to the nearest enclosing `where`/`select`
    context: Option<Collection>,
}

impl Environment {
    /// Environment with no constants at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fixed built-in constant table
    pub fn builtin() -> Self {
        let mut constants: HashMap<Arc<str>, Value> = HashMap::new();
        constants.insert(Arc::from("ucum"), Value::string(UCUM_SYSTEM));
        constants.insert(Arc::from("sct"), Value::string(SNOMED_SYSTEM));
        constants.insert(Arc::from("loinc"), Value::string(LOINC_SYSTEM));

        Self {
            constants: Arc::new(constants),
            resource: None,
            context: None,
        }
    }

    /// Add or replace a constant. A leading `%` on the name is ignored.
    pub fn with_constant(mut self, name: &str, value: Value) -> Self {
        let name = name.strip_prefix('%').unwrap_or(name);
        Arc::make_mut(&mut self.constants).insert(Arc::from(name), value);
        self
    }

    /// Look up an external constant (name without `%`)
    pub fn constant(&self, name: &str) -> Option<&Value> {
        match (&self.resource, name) {
            (Some(resource), RESOURCE) => Some(resource),
            _ => self.constants.get(name),
        }
    }

    /// Names of all bound constants, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constants.keys().map(|k| k.as_ref()).collect();
        if self.resource.is_some() && !self.constants.contains_key(RESOURCE) {
            names.push(RESOURCE);
        }
        names.sort_unstable();
        names
    }

    /// Bind `%resource` for one evaluation. The constant table is shared,
    /// not copied.
    pub fn with_resource(&self, resource: Value) -> Self {
        Self {
            constants: Arc::clone(&self.constants),
            resource: Some(resource),
            context: self.context.clone(),
        }
    }

    /// Captured context item, if one has been bound
    pub fn context(&self) -> Option<&Collection> {
        self.context.as_ref()
    }

    /// Rebind the context item for a nested evaluation
    pub fn with_context(&self, context: Collection) -> Self {
        Self {
            constants: Arc::clone(&self.constants),
            resource: self.resource.clone(),
            context: Some(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_constants() {
        let env = Environment::builtin();
        assert_eq!(
            env.constant("ucum").and_then(Value::as_str),
            Some("http://unitsofmeasure.org")
        );
        assert_eq!(env.names(), vec!["loinc", "sct", "ucum"]);
        assert!(env.constant("%ucum").is_none());
        assert!(env.context().is_none());
    }

    #[test]
    fn test_with_constant_does_not_touch_base() {
        let base = Environment::builtin();
        let extended = base
            .clone()
            .with_constant("%vs-gender", Value::string("http://example.org/vs"));
        assert!(extended.constant("vs-gender").is_some());
        assert!(base.constant("vs-gender").is_none());
    }

    #[test]
    fn test_with_resource_shares_constants() {
        let env = Environment::builtin().with_constant("resource", Value::string("table"));
        let bound = env.with_resource(Value::string("record"));
        assert!(Arc::ptr_eq(&env.constants, &bound.constants));
        assert_eq!(bound.constant("resource").and_then(Value::as_str), Some("record"));
        assert_eq!(env.constant("resource").and_then(Value::as_str), Some("table"));
        assert_eq!(bound.names(), vec!["loinc", "resource", "sct", "ucum"]);

        let nested = bound.with_context(Collection::empty());
        assert_eq!(nested.constant("resource").and_then(Value::as_str), Some("record"));
        assert!(Environment::builtin().constant("resource").is_none());
    }

    #[test]
    fn test_with_context_shares_constants() {
        let env = Environment::builtin();
        let nested = env.with_context(Collection::singleton(Value::integer(1)));
        assert_eq!(nested.context().map(Collection::len), Some(1));
        assert!(nested.constant("sct").is_some());
        assert!(env.context().is_none());
    }
}
