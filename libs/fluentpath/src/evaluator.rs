//! Tree-walking evaluator
//!
//! Every node maps a focus collection to a result collection. Absence is a
//! result, not an error: missing fields navigate to the empty collection and
//! empty operands propagate through comparisons and boolean operators.

use crate::ast::{AstNode, BinaryOperator, Literal, UnaryOperator};
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::functions::FunctionKind;
use crate::logic::ThreeValuedBoolean;
use crate::operations;
use crate::value::{Collection, Value};

/// Evaluate `node` against `focus`
pub fn evaluate(node: &AstNode, focus: &Collection, env: &Environment) -> Result<Collection> {
    match node {
        AstNode::Literal(literal) => Ok(Collection::singleton(literal_value(literal))),

        AstNode::PathStep { target, name } => {
            let input = evaluate_target(target.as_deref(), focus, env)?;
            Ok(navigate(&input, name))
        }

        AstNode::Invocation {
            target,
            function,
            arguments,
        } => {
            let input = evaluate_target(target.as_deref(), focus, env)?;
            invoke(*function, &input, arguments, focus, env)
        }

        AstNode::BinaryExpr {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, focus, env)?;
            let right = evaluate(right, focus, env)?;
            binary(*operator, &left, &right)
        }

        AstNode::UnaryExpr {
            operator: UnaryOperator::Not,
            operand,
        } => {
            let operand = evaluate(operand, focus, env)?;
            Ok(ThreeValuedBoolean::from_collection(&operand)
                .not()
                .into_collection())
        }

        AstNode::ExternalConstantRef(name) => env
            .constant(name)
            .cloned()
            .map(Collection::singleton)
            .ok_or_else(|| EvalError::UndefinedConstant(name.clone()).into()),

        AstNode::ContextRef => Ok(env.context().cloned().unwrap_or_else(|| focus.clone())),

        AstNode::UnionExpr(operands) => {
            let results = operands
                .iter()
                .map(|operand| evaluate(operand, focus, env))
                .collect::<Result<Vec<_>>>()?;
            Ok(operations::union(&results))
        }
    }
}

fn evaluate_target(
    target: Option<&AstNode>,
    focus: &Collection,
    env: &Environment,
) -> Result<Collection> {
    match target {
        Some(target) => evaluate(target, focus, env),
        None => Ok(focus.clone()),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Boolean(b) => Value::boolean(*b),
        Literal::String(s) => Value::string(s.as_str()),
        Literal::Integer(n) => Value::integer(*n),
        Literal::Decimal(d) => Value::decimal(*d),
    }
}

/// Member navigation across every focus item, in order
fn navigate(input: &Collection, name: &str) -> Collection {
    let mut result = Collection::empty();
    for item in input.iter() {
        if let Some(values) = item.field(name) {
            result.extend_from(values);
        }
    }
    result
}

fn binary(operator: BinaryOperator, left: &Collection, right: &Collection) -> Result<Collection> {
    match operator {
        BinaryOperator::And => Ok(ThreeValuedBoolean::from_collection(left)
            .and(ThreeValuedBoolean::from_collection(right))
            .into_collection()),
        BinaryOperator::Or => Ok(ThreeValuedBoolean::from_collection(left)
            .or(ThreeValuedBoolean::from_collection(right))
            .into_collection()),
        BinaryOperator::In => Ok(operations::membership(left, right)),
        _ => operations::compare(operator, left, right),
    }
}

/// Call a built-in function on `input`.
///
/// `outer` is the focus the invocation was evaluated against; functions with
/// per-item arguments expose it to those arguments as `$context`.
fn invoke(
    function: FunctionKind,
    input: &Collection,
    arguments: &[AstNode],
    outer: &Collection,
    env: &Environment,
) -> Result<Collection> {
    if function.metadata().per_item_arguments {
        return invoke_per_item(function, input, arguments, outer, env);
    }
    match function {
        FunctionKind::Empty => Ok(Collection::singleton(Value::boolean(input.is_empty()))),
        FunctionKind::Not => Ok(ThreeValuedBoolean::from_collection(input)
            .not()
            .into_collection()),
        FunctionKind::Distinct => Ok(operations::distinct(input)),
        // handled by invoke_per_item
        FunctionKind::Where | FunctionKind::Select => Ok(Collection::empty()),
    }
}

/// Evaluate the arguments once for every input item, with that item alone as
/// the focus and `outer` bound as `$context`
fn invoke_per_item(
    function: FunctionKind,
    input: &Collection,
    arguments: &[AstNode],
    outer: &Collection,
    env: &Environment,
) -> Result<Collection> {
    let nested = env.with_context(outer.clone());
    let mut result = Collection::with_capacity(input.len());

    for item in input.iter() {
        let item_focus = Collection::singleton(item.clone());
        let values = arguments
            .iter()
            .map(|argument| evaluate(argument, &item_focus, &nested))
            .collect::<Result<Vec<_>>>()?;

        match (function, values.first()) {
            (FunctionKind::Where, Some(matched)) => {
                if ThreeValuedBoolean::from_collection(matched).is_true() {
                    result.push(item.clone());
                }
            }
            (FunctionKind::Select, Some(projected)) => result.extend_from(projected),
            _ => {}
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::parse;
    use serde_json::json;

    fn eval(expr: &str, record: serde_json::Value) -> Result<Collection> {
        let ast = parse(expr)?;
        evaluate(&ast, &Collection::from_json(&record), &Environment::builtin())
    }

    fn strings(collection: &Collection) -> Vec<String> {
        collection
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_navigation_flattens_lists() {
        let record = json!({"name": [{"given": ["a", "b"]}, {"given": "c"}, {"family": "x"}]});
        let result = eval("name.given", record).unwrap();
        assert_eq!(strings(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_path_is_empty() {
        let result = eval("period.start.value", json!({"frequency": "daily"})).unwrap();
        assert!(result.is_empty());
        let result = eval("frequency.value", json!({"frequency": "daily"})).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_union_preserves_duplicates_and_order() {
        let result = eval("b | a | b", json!({"a": "1", "b": "2"})).unwrap();
        assert_eq!(strings(&result), vec!["2", "1", "2"]);
        assert_eq!(eval("'a' | 'a'", json!({})).unwrap().len(), 2);
    }

    #[test]
    fn test_where_and_select() {
        let record = json!({"item": [
            {"kind": "x", "v": 1},
            {"kind": "y", "v": 2},
            {"kind": "x", "v": 3}
        ]});
        let result = eval("item.where(kind = 'x').select(v)", record).unwrap();
        let values: Vec<i64> = result
            .iter()
            .filter_map(|v| match v.data() {
                crate::value::ValueData::Integer(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![1, 3]);
    }

    #[test]
    fn test_context_is_outer_focus() {
        let record = json!({
            "code": "a",
            "component": [{"code": "a"}, {"code": "b"}]
        });
        let result = eval("component.where(code = $context.code).code", record.clone()).unwrap();
        assert_eq!(strings(&result), vec!["a"]);
        let top = eval("$context.code", record).unwrap();
        assert_eq!(strings(&top), vec!["a"]);
    }

    #[test]
    fn test_undefined_constant() {
        let err = eval("%nope", json!({})).unwrap_err();
        assert_eq!(err, Error::Eval(EvalError::UndefinedConstant("nope".into())));
        let ucum = eval("%ucum", json!({})).unwrap();
        assert_eq!(strings(&ucum), vec!["http://unitsofmeasure.org"]);
    }

    #[test]
    fn test_per_item_arguments_run_once_per_item() {
        // No items, so the argument is never evaluated
        assert!(eval("missing.where(%nope)", json!({})).unwrap().is_empty());
        assert!(eval("missing.select(%nope)", json!({})).unwrap().is_empty());
        assert!(eval("a.where(%nope)", json!({"a": [1, 2]})).is_err());

        let result = eval("a.select($context.b)", json!({"a": [1, 2, 3], "b": "x"})).unwrap();
        assert_eq!(strings(&result), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_not_propagates_empty() {
        assert!(eval("missing.not()", json!({})).unwrap().is_empty());
        let result = eval("flag.not()", json!({"flag": false})).unwrap();
        assert_eq!(result.as_singleton().and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn test_and_with_empty_operand() {
        let result = eval("a and missing", json!({"a": true})).unwrap();
        assert!(result.is_empty());
        let result = eval("a and missing", json!({"a": false})).unwrap();
        assert_eq!(result.as_singleton().and_then(Value::as_bool), Some(false));
        let result = eval("a or missing", json!({"a": true})).unwrap();
        assert_eq!(result.as_singleton().and_then(Value::as_bool), Some(true));
    }
}
