//! Field-population predicates for raw descriptor data.
//!
//! Raw descriptors arrive as loosely typed JSON. Two distinct rules decide
//! whether a raw field is taken over:
//!
//! - [`has_value`]: the key exists *and* its value is truthy. Falsy values
//!   (`null`, `false`, `0`, `""`) fall back to the documented default.
//! - [`has_key`]: the key exists, whatever its value. Explicit falsy values
//!   are kept as given.
//!
//! The two are not interchangeable: `value` on a descriptor and pass-through
//! property extras use [`has_key`], everything else uses [`has_value`].

use serde_json::Value;

/// Truthiness of a JSON value.
///
/// `null`, `false`, zero (including `-0` and non-finite numbers) and the empty
/// string are falsy. Arrays and objects are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `true` when `key` is present on `obj`. Non-object values have no keys.
pub fn has_key(obj: &Value, key: &str) -> bool {
    obj.as_object().is_some_and(|map| map.contains_key(key))
}

/// `true` when `key` is present on `obj` and holds a truthy value.
pub fn has_value(obj: &Value, key: &str) -> bool {
    truthy_field(obj, key).is_some()
}

/// The value under `key` when it passes [`has_value`].
pub fn truthy_field<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| is_truthy(v))
}

/// Render a truthy field as text.
///
/// Strings are taken verbatim; other scalars use their JSON rendering so a
/// numeric label such as `7` still reads as `"7"`.
pub fn truthy_text(obj: &Value, key: &str) -> Option<String> {
    truthy_field(obj, key).map(as_text)
}

pub(crate) fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!(true), true)]
    #[case(json!(-1), true)]
    #[case(json!("0"), true)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[test]
    fn has_key_ignores_truthiness() {
        let obj = json!({"value": 0, "other": null});
        assert!(has_key(&obj, "value"));
        assert!(has_key(&obj, "other"));
        assert!(!has_key(&obj, "missing"));
    }

    #[test]
    fn has_value_requires_truthy() {
        let obj = json!({"label": "", "id": "x", "count": 0});
        assert!(!has_value(&obj, "label"));
        assert!(has_value(&obj, "id"));
        assert!(!has_value(&obj, "count"));
        assert!(!has_value(&obj, "missing"));
    }

    #[test]
    fn non_objects_have_no_keys() {
        assert!(!has_key(&json!("text"), "0"));
        assert!(!has_key(&json!([1, 2]), "0"));
        assert!(!has_value(&json!(null), "label"));
    }

    #[test]
    fn truthy_text_renders_scalars() {
        let obj = json!({"a": "hello", "b": 7, "c": true, "d": ""});
        assert_eq!(truthy_text(&obj, "a").as_deref(), Some("hello"));
        assert_eq!(truthy_text(&obj, "b").as_deref(), Some("7"));
        assert_eq!(truthy_text(&obj, "c").as_deref(), Some("true"));
        assert_eq!(truthy_text(&obj, "d"), None);
    }
}
