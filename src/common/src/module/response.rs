use serde::Serialize;
use serde_json::Value;

/// The single JSON object a module prints before exiting.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModuleResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ModuleResponse {
    pub fn exit(changed: bool) -> Self {
        Self {
            changed,
            failed: false,
            skipped: false,
            msg: None,
            meta: None,
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            skipped: false,
            msg: Some(Value::String(msg.into())),
            meta: None,
        }
    }

    /// The module did nothing, e.g. because check mode is not supported.
    pub fn skip(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: false,
            skipped: true,
            msg: Some(Value::String(msg.into())),
            meta: None,
        }
    }

    pub fn with_msg(mut self, msg: impl Into<Value>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"changed":false,"failed":true,"msg":"failed to encode module response: {}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }

    /// Prints the response on stdout and returns the process exit code.
    pub fn emit(&self) -> i32 {
        println!("{}", self.to_json());
        self.exit_code()
    }
}
