use ferrum_fluentpath::{evaluate, Outcome, Value};
use serde_json::json;

fn observation() -> serde_json::Value {
    json!({
        "code": {"coding": [{"code": "foo"}, {"code": "bar"}]},
        "component": [
            {"code": {"coding": [{"code": "foo"}, {"code": "bar"}]}, "value": 1},
            {"code": {"coding": [{"code": "baz"}]}, "value": 2}
        ]
    })
}

#[test]
fn context_refers_to_enclosing_focus() {
    let result = evaluate("component.where(code = $context.code).value", &observation()).unwrap();
    assert_eq!(result, Outcome::Value(Value::integer(1)));
}

#[test]
fn context_at_top_level_is_the_record() {
    let result = evaluate("$context.component.value", &observation()).unwrap();
    assert_eq!(result.to_json(), json!([1, 2]));
}

#[test]
fn context_inside_select() {
    // $context is the record, so every component projects the root codes
    let result = evaluate("component.select($context.code.coding.code)", &observation()).unwrap();
    assert_eq!(result.to_json(), json!(["foo", "bar", "foo", "bar"]));
}

#[test]
fn nested_filters_rebind_context() {
    let data = json!({
        "group": [
            {"kind": "a", "item": [{"kind": "a", "n": 1}, {"kind": "b", "n": 2}]},
            {"kind": "b", "item": [{"kind": "a", "n": 3}, {"kind": "b", "n": 4}]}
        ]
    });
    // Inside the inner where, $context is the group being projected
    let result = evaluate(
        "group.select(item.where(kind = $context.kind).n)",
        &data,
    )
    .unwrap();
    assert_eq!(result.to_json(), json!([1, 4]));
}

#[test]
fn where_predicate_sees_single_item() {
    let data = json!({"entry": [{"v": 1}, {"v": 2}, {"v": 2}]});
    let result = evaluate("entry.where(v = 2).v", &data).unwrap();
    assert_eq!(result.to_json(), json!([2, 2]));
    let distinct = evaluate("entry.where(v = 2).v.distinct()", &data).unwrap();
    assert_eq!(distinct, Outcome::Value(Value::integer(2)));
}
