use ferrum_fluentpath::{Collection, Engine, Error, Expression, Outcome, Value};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn compile_once_evaluate_many() {
    let engine = Engine::new();
    let expression = engine.compile("start.empty() or end.empty() or (start <= end)").unwrap();
    assert!(expression.is_predicate());

    let records = [
        (json!({"start": "2016-06-06", "end": "2016-06-16"}), true),
        (json!({"start": "2016-06-06", "end": "2016-06-01"}), false),
        (json!({"end": "2016-06-01"}), true),
    ];
    for (record, expected) in records {
        let value = Value::from_json(&record).unwrap();
        let collection = engine.evaluate_collection(&expression, &value).unwrap();
        let outcome = Outcome::from_collection(collection, expression.is_predicate());
        assert_eq!(outcome.as_boolean(), Some(expected), "{}", record);
    }
    assert_eq!(engine.cached_expressions(), 1);
}

#[test]
fn standalone_expression_matches_compiled() {
    let source = "uniqueId.where(preferred = true).select(type).distinct()";
    let standalone = Expression::parse(source).unwrap();
    let compiled = Engine::new().compile(source).unwrap();
    assert_eq!(&standalone, compiled.as_ref());
    assert!(!standalone.is_predicate());
}

#[test]
fn raw_collection_is_not_coerced() {
    let engine = Engine::new();
    let expression = engine.compile("(a and missing).not()").unwrap();
    let record = Value::from_json(&json!({"a": true})).unwrap();
    let raw = engine.evaluate_collection(&expression, &record).unwrap();
    assert_eq!(raw, Collection::empty());
    assert_eq!(
        engine.evaluate("(a and missing).not()", &record).unwrap(),
        Outcome::Value(Value::boolean(true))
    );
}

#[test]
fn errors_surface_before_evaluation() {
    let engine = Engine::new();
    assert!(matches!(
        engine.evaluate_json("a = 'b", &json!({})),
        Err(Error::Lex(_))
    ));
    assert!(matches!(
        engine.evaluate_json("a.exists()", &json!({})),
        Err(Error::Parse(_))
    ));
    assert!(matches!(
        engine.evaluate_json("(a", &json!({})),
        Err(Error::Parse(_))
    ));
}

#[test]
fn array_documents_evaluate_each_item() {
    let engine = Engine::new();
    let outcome = engine
        .evaluate_json("code", &json!([{"code": "a"}, {"code": "b"}]))
        .unwrap();
    assert_eq!(outcome.to_json(), json!(["a", "b"]));
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(Engine::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let record = json!({"n": i, "flag": i % 2 == 0});
                engine
                    .evaluate_json("flag.not()", &record)
                    .map(|outcome| outcome.as_boolean())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap().unwrap();
        assert_eq!(result, Some(i % 2 != 0));
    }
    assert_eq!(engine.cached_expressions(), 1);
}

#[test]
fn deep_chains_fail_to_parse_instead_of_overflowing() {
    let record = json!({"a": 1});
    let source = format!("a{}", ".a".repeat(20_000));
    assert!(matches!(
        Engine::new().evaluate_json(&source, &record),
        Err(Error::Parse(_))
    ));

    let nested = json!({"a": {"a": {"a": 1}}});
    let outcome = Engine::new().evaluate_json("a.a.a", &nested).unwrap();
    assert_eq!(outcome, Outcome::Value(Value::integer(1)));
}
