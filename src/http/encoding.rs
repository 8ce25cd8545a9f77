use serde_json::Value;
use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Append encoded `params` to `url`, joining with `?` or `&` as needed.
pub fn append_query(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    let separator = match url.find('?') {
        None => "?",
        Some(_) if url.ends_with('?') || url.ends_with('&') => "",
        Some(_) => "&",
    };
    format!("{url}{separator}{query}")
}

/// Form-encode a body value as `key=value&...`.
///
/// Object fields that are `null` or empty strings are dropped; nested objects
/// and arrays are sent as their JSON text. A non-object value has no fields to
/// encode and is sent as JSON text.
pub fn encode_form(value: &Value) -> String {
    let Value::Object(map) = value else {
        return match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, field) in map {
        if let Some(text) = form_field_text(field) {
            serializer.append_pair(key, &text);
        }
    }
    serializer.finish()
}

fn form_field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn query_appends_with_correct_separator() {
        let q = params(&[("a", "1"), ("b", "x y")]);
        assert_eq!(append_query("https://x/y", &q), "https://x/y?a=1&b=x+y");
        assert_eq!(append_query("https://x/y?z=0", &q), "https://x/y?z=0&a=1&b=x+y");
        assert_eq!(append_query("https://x/y?", &q), "https://x/y?a=1&b=x+y");
        assert_eq!(append_query("https://x/y", &[]), "https://x/y");
    }

    #[test]
    fn form_encodes_simple_fields() {
        assert_eq!(encode_form(&json!({"a": 1})), "a=1");
        assert_eq!(encode_form(&json!({"a": true, "b": "hi"})), "a=true&b=hi");
    }

    #[test]
    fn form_drops_null_and_empty_values() {
        assert_eq!(
            encode_form(&json!({"a": null, "b": "", "c": "kept", "d": 0})),
            "c=kept&d=0"
        );
    }

    #[test]
    fn form_stringifies_nested_values() {
        let encoded = encode_form(&json!({"data": {"id": 7}, "ids": [1, 2]}));
        let decoded: Vec<(String, String)> = form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            decoded,
            vec![
                ("data".to_string(), r#"{"id":7}"#.to_string()),
                ("ids".to_string(), "[1,2]".to_string()),
            ]
        );
    }

    #[test]
    fn form_of_non_object_is_json_text() {
        assert_eq!(encode_form(&json!([1, 2])), "[1,2]");
        assert_eq!(encode_form(&json!("raw")), "raw");
    }
}
