use runlog_common::module::{coerce_str, load_args, ModuleInvocation, ModuleParams, ModuleResponse};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EchoParams {
    #[serde(deserialize_with = "coerce_str")]
    pub key1: String,
    #[serde(deserialize_with = "coerce_str")]
    pub key2: String,
}

impl ModuleParams for EchoParams {
    const REQUIRED: &'static [&'static str] = &["key1", "key2"];
}

/// Echoes both inputs back under `meta`. Safe in check mode since nothing changes.
pub fn run(invocation: ModuleInvocation<EchoParams>) -> ModuleResponse {
    match serde_json::to_value(&invocation.params) {
        Ok(meta) => ModuleResponse::exit(false).with_meta(meta),
        Err(err) => ModuleResponse::fail(err.to_string()),
    }
}

pub fn run_from_file(path: impl AsRef<Path>) -> ModuleResponse {
    match load_args::<EchoParams>(path) {
        Ok(invocation) => run(invocation),
        Err(err) => ModuleResponse::fail(err.to_string()),
    }
}
