use crate::tags::{ensure_absent, ensure_present, host_exists, DatadogClient, TagApi, TagSyncResult};
use runlog_common::constants::{DEFAULT_DATADOG_API_HOST, TAG_SOURCE};
use runlog_common::module::{load_args, ModuleInvocation, ModuleParams, ModuleResponse};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

const MODULE_NAME: &str = "datadog_tags";
const MISSING_TAGS_MSG: &str = "state is present but all of the following are missing: tags";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagState {
    Present,
    Absent,
}

/// Module parameters. The keys are secrets and are kept out of `Debug` output.
#[derive(Clone, Deserialize, PartialEq)]
pub struct DatadogTagsParams {
    pub api_key: String,
    pub app_key: String,
    pub host: String,
    #[serde(default, deserialize_with = "deserialize_tag_list")]
    pub tags: Option<Vec<String>>,
    pub state: TagState,
    #[serde(default)]
    pub api_host: Option<String>,
}

impl fmt::Debug for DatadogTagsParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatadogTagsParams")
            .field("api_key", &"********")
            .field("app_key", &"********")
            .field("host", &self.host)
            .field("tags", &self.tags)
            .field("state", &self.state)
            .field("api_host", &self.api_host)
            .finish()
    }
}

impl ModuleParams for DatadogTagsParams {
    const REQUIRED: &'static [&'static str] = &["api_key", "app_key", "host", "state"];
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagListInput {
    Csv(String),
    List(Vec<String>),
}

/// Accepts either a JSON list or a comma-separated string.
fn deserialize_tag_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<TagListInput>::deserialize(deserializer)?;
    Ok(input.map(|input| {
        let raw = match input {
            TagListInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
            TagListInput::List(list) => list,
        };
        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }))
}

/// Runs one module invocation against `api`.
pub async fn run_with_api<A: TagApi>(
    api: &A,
    invocation: &ModuleInvocation<DatadogTagsParams>,
) -> ModuleResponse {
    if invocation.check_mode {
        return ModuleResponse::skip(format!(
            "remote module ({}) does not support check mode",
            MODULE_NAME
        ));
    }

    let params = &invocation.params;
    let outcome: TagSyncResult<_> = match params.state {
        TagState::Present => {
            let Some(tags) = params.tags.as_deref() else {
                // Unknown hosts are a no-op whatever the tags, so only a known host needs them.
                return match host_exists(api, &params.host).await {
                    Ok(false) => ModuleResponse::exit(false),
                    Ok(true) => ModuleResponse::fail(MISSING_TAGS_MSG),
                    Err(err) => ModuleResponse::fail(err.to_string()),
                };
            };
            ensure_present(api, &params.host, tags, TAG_SOURCE).await
        }
        TagState::Absent => ensure_absent(api, &params.host, TAG_SOURCE).await,
    };

    match outcome {
        Ok(outcome) => {
            let response = ModuleResponse::exit(outcome.changed);
            match outcome.msg {
                Some(msg) => response.with_msg(msg),
                None => response,
            }
        }
        Err(err) => ModuleResponse::fail(err.to_string()),
    }
}

pub async fn run(invocation: ModuleInvocation<DatadogTagsParams>) -> ModuleResponse {
    let params = &invocation.params;
    let api_host = params
        .api_host
        .as_deref()
        .unwrap_or(DEFAULT_DATADOG_API_HOST);

    match DatadogClient::new(api_host, &params.api_key, &params.app_key) {
        Ok(client) => run_with_api(&client, &invocation).await,
        Err(err) => ModuleResponse::fail(err.to_string()),
    }
}

pub async fn run_from_file(path: impl AsRef<Path>) -> ModuleResponse {
    match load_args::<DatadogTagsParams>(path) {
        Ok(invocation) => run(invocation).await,
        Err(err) => ModuleResponse::fail(err.to_string()),
    }
}
