/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object keys are string literals. Array elements and member values are
/// single token trees, so negative numbers and longer expressions go in
/// parentheses. Anything that is not a literal `null`, `true`, `false`,
/// array or object is converted with [`to_value`](crate::to_value).
///
/// ```rust
/// use codable_json::{json, Value};
///
/// let limit = 10;
/// let value = json!({
///     "name": "widget",
///     "tags": ["a", "b"],
///     "limit": limit,
///     "offset": (-1),
///     "extra": null
/// });
/// assert_eq!(value["tags"][0], Value::from("a"));
/// assert_eq!(value["offset"].as_i64(), Some(-1));
/// ```
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![$($crate::json!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert(::std::string::String::from($key), $crate::json!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Number, Value};

    #[test]
    fn test_json_macro_primitives() {
        assert_eq!(json!(null), Value::Null);
        assert_eq!(json!(true), Value::Bool(true));
        assert_eq!(json!(42), Value::Number(Number::PosInt(42)));
        assert_eq!(json!((-7)), Value::Number(Number::NegInt(-7)));
        assert_eq!(json!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(json!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_json_macro_containers() {
        assert_eq!(json!([]), Value::Array(vec![]));
        assert_eq!(json!({}), Value::Object(Map::new()));

        let value = json!({ "list": [1, [2, 3], { "deep": false }], "trailing": 1, });
        assert_eq!(value["list"][1][0].as_u64(), Some(2));
        assert_eq!(value["list"][2]["deep"], Value::Bool(false));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["list", "trailing"]);
    }

    #[test]
    fn test_json_macro_expressions() {
        let names = vec!["x", "y"];
        let value = json!({ "names": names, "sum": (1 + 2), "none": (None::<i32>) });
        assert_eq!(value["names"], Value::from(vec!["x", "y"]));
        assert_eq!(value["sum"].as_i64(), Some(3));
        assert!(value["none"].is_null());
    }
}
