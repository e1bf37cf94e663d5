use serde::Serialize;
use serde_json::{Map, Value};

pub const CENSORED_MESSAGE: &str =
    "the output has been hidden due to the fact that 'no_log: true' was specified for this result";
pub const UNSERIALIZABLE_PLACEHOLDER: &str = "<unserializable result>";

const INTERNAL_KEY_PREFIX: &str = "_ansible_";
const NO_LOG_KEY: &str = "_ansible_no_log";
const DROPPED_TOP_LEVEL_KEYS: [&str; 3] = ["exception", "invocation", "diff"];

/// Serializes a task result for inclusion in a record.
///
/// Never fails: anything that cannot be turned into JSON becomes
/// [`UNSERIALIZABLE_PLACEHOLDER`].
pub fn dump_results<T: Serialize + ?Sized>(result: &T) -> String {
    let value = match serde_json::to_value(result) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Could not serialize task result: {}", err);
            return UNSERIALIZABLE_PLACEHOLDER.to_string();
        }
    };

    let cleaned = clean_result(value);
    serde_json::to_string(&sort_keys(cleaned))
        .unwrap_or_else(|_| UNSERIALIZABLE_PLACEHOLDER.to_string())
}

fn clean_result(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.get(NO_LOG_KEY).and_then(Value::as_bool).unwrap_or(false) {
                let mut censored = Map::new();
                censored.insert("censored".into(), Value::String(CENSORED_MESSAGE.into()));
                return Value::Object(censored);
            }

            let map = map
                .into_iter()
                .filter(|(key, _)| !DROPPED_TOP_LEVEL_KEYS.contains(&key.as_str()))
                .collect();
            strip_internal_keys(Value::Object(map))
        }
        other => strip_internal_keys(other),
    }
}

fn strip_internal_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.starts_with(INTERNAL_KEY_PREFIX))
                .map(|(key, value)| (key, strip_internal_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_internal_keys).collect()),
        other => other,
    }
}

// serde_json may be built with `preserve_order`; sort explicitly.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error;
    use serde_json::json;

    #[test]
    fn strips_internal_and_noisy_keys() {
        let result = json!({
            "changed": true,
            "_ansible_verbose_always": true,
            "invocation": {"module_args": {}},
            "exception": "Traceback",
            "diff": [],
            "stdout_lines": [{"_ansible_item_label": "x", "line": "ok"}],
        });

        assert_eq!(
            dump_results(&result),
            r#"{"changed":true,"stdout_lines":[{"line":"ok"}]}"#
        );
    }

    #[test]
    fn censors_no_log_results() {
        let result = json!({"_ansible_no_log": true, "password": "hunter2"});
        let dumped = dump_results(&result);

        assert!(!dumped.contains("hunter2"));
        assert!(dumped.contains(CENSORED_MESSAGE));
    }

    #[test]
    fn keys_are_sorted() {
        let result = json!({"zeta": 1, "alpha": {"b": 2, "a": 1}});
        assert_eq!(dump_results(&result), r#"{"alpha":{"a":1,"b":2},"zeta":1}"#);
    }

    #[test]
    fn non_object_results_pass_through() {
        assert_eq!(dump_results(&json!(null)), "null");
        assert_eq!(dump_results(&json!(["a", 1])), r#"["a",1]"#);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn unserializable_results_fall_back_to_placeholder() {
        assert_eq!(dump_results(&Unserializable), UNSERIALIZABLE_PLACEHOLDER);
    }
}
