use ferrum_fluentpath::environment::{LOINC_SYSTEM, SNOMED_SYSTEM, UCUM_SYSTEM};
use ferrum_fluentpath::{Engine, Environment, Error, EvalError, Outcome, Value};
use serde_json::json;

#[test]
fn resolves_builtin_constants() {
    let engine = Engine::new();
    for (expr, expected) in [
        ("%ucum", UCUM_SYSTEM),
        ("%sct", SNOMED_SYSTEM),
        ("%loinc", LOINC_SYSTEM),
    ] {
        let result = engine.evaluate_json(expr, &json!({})).expect("evaluation failed");
        assert_eq!(result, Outcome::Value(Value::string(expected)), "{}", expr);
    }
}

#[test]
fn resolves_resource_constant() {
    let record = json!({"resourceType": "Observation", "id": "o1"});
    let engine = Engine::new();

    let result = engine
        .evaluate_json("%resource", &record)
        .expect("evaluation failed");
    assert_eq!(result.to_json(), record);

    let id = engine
        .evaluate_json("%resource.id = id", &record)
        .expect("evaluation failed");
    assert_eq!(id.as_boolean(), Some(true));
}

#[test]
fn resource_is_bound_per_call() {
    let engine = Engine::new();
    let first = engine.evaluate_json("%resource.id", &json!({"id": "a"})).unwrap();
    let second = engine.evaluate_json("%resource.id", &json!({"id": "b"})).unwrap();
    assert_eq!(first, Outcome::Value(Value::string("a")));
    assert_eq!(second, Outcome::Value(Value::string("b")));
}

#[test]
fn undefined_constant_is_an_error() {
    let engine = Engine::new();
    let err = engine
        .evaluate_json("system = %unknown", &json!({"system": "x"}))
        .unwrap_err();
    assert_eq!(err, Error::Eval(EvalError::UndefinedConstant("unknown".into())));
    assert_eq!(err.to_string(), "Undefined external constant: %unknown");
    assert_eq!(err.offset(), None);
}

#[test]
fn undefined_constant_errors_even_when_data_is_absent() {
    let err = Engine::new()
        .evaluate_json("missing.empty() or %unknown", &json!({}))
        .unwrap_err();
    assert!(matches!(err, Error::Eval(EvalError::UndefinedConstant(_))));
}

#[test]
fn supplied_environment_extends_builtins() {
    let environment = Environment::builtin()
        .with_constant("%vs-gender", Value::string("http://hl7.org/fhir/ValueSet/gender"));
    let engine = Engine::new().with_environment(environment);

    let matches = engine
        .evaluate_json(
            "valueSet = %vs-gender or system = %ucum",
            &json!({"valueSet": "other", "system": UCUM_SYSTEM}),
        )
        .unwrap();
    assert_eq!(matches.as_boolean(), Some(true));
    assert_eq!(
        engine.environment().names(),
        vec!["loinc", "sct", "ucum", "vs-gender"]
    );
}
