use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

const WRAPPED_ARGS_KEY: &str = "ANSIBLE_MODULE_ARGS";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";
const INTERNAL_KEY_PREFIX: &str = "_ansible_";

/// Parameters a module accepts, with the names that must be present and non-null.
pub trait ModuleParams: DeserializeOwned {
    const REQUIRED: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInvocation<P> {
    pub params: P,
    pub check_mode: bool,
}

#[derive(Debug)]
pub enum ModuleError {
    Io(std::io::Error),
    InvalidJson(serde_json::Error),
    NotAnObject,
    MissingRequired(Vec<String>),
    InvalidParams(serde_json::Error),
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::Io(e) => write!(f, "Failed to read module arguments: {}", e),
            ModuleError::InvalidJson(e) => write!(f, "Module arguments are not valid JSON: {}", e),
            ModuleError::NotAnObject => write!(f, "Module arguments must be a JSON object"),
            ModuleError::MissingRequired(names) => {
                write!(f, "missing required arguments: {}", names.join(", "))
            }
            ModuleError::InvalidParams(e) => write!(f, "Invalid module arguments: {}", e),
        }
    }
}

impl std::error::Error for ModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModuleError::Io(e) => Some(e),
            ModuleError::InvalidJson(e) | ModuleError::InvalidParams(e) => Some(e),
            ModuleError::NotAnObject | ModuleError::MissingRequired(_) => None,
        }
    }
}

impl From<std::io::Error> for ModuleError {
    fn from(err: std::io::Error) -> Self {
        ModuleError::Io(err)
    }
}

pub fn load_args<P: ModuleParams>(path: impl AsRef<Path>) -> Result<ModuleInvocation<P>, ModuleError> {
    let raw = std::fs::read_to_string(path)?;
    parse_args(&raw)
}

pub fn parse_args<P: ModuleParams>(raw: &str) -> Result<ModuleInvocation<P>, ModuleError> {
    let value: Value = serde_json::from_str(raw).map_err(ModuleError::InvalidJson)?;
    let mut args = match value {
        Value::Object(map) => unwrap_args(map)?,
        _ => return Err(ModuleError::NotAnObject),
    };

    let check_mode = args
        .get(CHECK_MODE_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    args.retain(|key, _| !key.starts_with(INTERNAL_KEY_PREFIX));

    let missing: Vec<String> = P::REQUIRED
        .iter()
        .filter(|name| args.get(**name).map_or(true, Value::is_null))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ModuleError::MissingRequired(missing));
    }

    let params = serde_json::from_value(Value::Object(args)).map_err(ModuleError::InvalidParams)?;
    Ok(ModuleInvocation { params, check_mode })
}

/// Deserializes a `str` parameter, accepting numbers and booleans the way the engine
/// converts them (`5` becomes `"5"`).
pub fn coerce_str<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if b { "True" } else { "False" }.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

fn unwrap_args(mut map: Map<String, Value>) -> Result<Map<String, Value>, ModuleError> {
    if map.len() == 1 {
        if let Some(inner) = map.remove(WRAPPED_ARGS_KEY) {
            return match inner {
                Value::Object(inner) => Ok(inner),
                _ => Err(ModuleError::NotAnObject),
            };
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Params {
        name: String,
        #[serde(default)]
        count: Option<u32>,
    }

    impl ModuleParams for Params {
        const REQUIRED: &'static [&'static str] = &["name"];
    }

    #[test]
    fn parses_plain_args_and_check_mode() {
        let invocation: ModuleInvocation<Params> =
            parse_args(r#"{"name":"x","count":2,"_ansible_check_mode":true,"_ansible_verbosity":0}"#)
                .unwrap();

        assert!(invocation.check_mode);
        assert_eq!(
            invocation.params,
            Params {
                name: "x".into(),
                count: Some(2)
            }
        );
    }

    #[test]
    fn unwraps_module_args_envelope() {
        let invocation: ModuleInvocation<Params> =
            parse_args(r#"{"ANSIBLE_MODULE_ARGS":{"name":"y"}}"#).unwrap();

        assert!(!invocation.check_mode);
        assert_eq!(invocation.params.name, "y");
    }

    #[test]
    fn reports_missing_and_null_required_args() {
        let err = parse_args::<Params>(r#"{"count":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "missing required arguments: name");

        let err = parse_args::<Params>(r#"{"name":null}"#).unwrap_err();
        assert!(matches!(err, ModuleError::MissingRequired(_)));
    }

    #[test]
    fn rejects_non_object_args() {
        assert!(matches!(
            parse_args::<Params>("[1,2]").unwrap_err(),
            ModuleError::NotAnObject
        ));
        assert!(matches!(
            parse_args::<Params>("not json").unwrap_err(),
            ModuleError::InvalidJson(_)
        ));
    }

    #[test]
    fn loads_args_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name":"from-file"}}"#).unwrap();

        let invocation: ModuleInvocation<Params> = load_args(file.path()).unwrap();
        assert_eq!(invocation.params.name, "from-file");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        #[serde(deserialize_with = "coerce_str")]
        name: String,
    }

    impl ModuleParams for Named {
        const REQUIRED: &'static [&'static str] = &["name"];
    }

    #[test]
    fn scalars_are_coerced_to_strings() {
        let parse = |raw: &str| parse_args::<Named>(raw).map(|i| i.params.name);

        assert_eq!(parse(r#"{"name":"x"}"#).unwrap(), "x");
        assert_eq!(parse(r#"{"name":5}"#).unwrap(), "5");
        assert_eq!(parse(r#"{"name":1.5}"#).unwrap(), "1.5");
        assert_eq!(parse(r#"{"name":true}"#).unwrap(), "True");
        assert!(matches!(
            parse(r#"{"name":["a"]}"#).unwrap_err(),
            ModuleError::InvalidParams(_)
        ));
    }
}
