use crate::stats::PlaybookStats;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one task on one target host, as reported by the orchestration engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    pub host: String,
    #[serde(default)]
    pub task: Value,
    #[serde(default)]
    pub result: Value,
}

impl TaskResult {
    pub fn new(host: impl Into<String>, task: Value, result: Value) -> Self {
        Self {
            host: host.into(),
            task,
            result,
        }
    }
}

/// Lifecycle events raised during one playbook run, in the order work happens.
///
/// On the wire each event is a JSON object tagged by its `event` field, e.g.
/// `{"event": "on_start", "playbook": "site.yml"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunnerEvent {
    OnStart {
        playbook: String,
    },
    OnStats {
        stats: PlaybookStats,
    },
    OnOk(TaskResult),
    OnSkipped(TaskResult),
    OnFailed(TaskResult),
    OnUnreachable(TaskResult),
    OnAsyncFailed(TaskResult),
    OnImportForHost {
        result: TaskResult,
        imported_file: String,
    },
    OnNotImportForHost {
        result: TaskResult,
        missing_file: String,
    },
}

impl RunnerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerEvent::OnStart { .. } => "on_start",
            RunnerEvent::OnStats { .. } => "on_stats",
            RunnerEvent::OnOk(_) => "on_ok",
            RunnerEvent::OnSkipped(_) => "on_skipped",
            RunnerEvent::OnFailed(_) => "on_failed",
            RunnerEvent::OnUnreachable(_) => "on_unreachable",
            RunnerEvent::OnAsyncFailed(_) => "on_async_failed",
            RunnerEvent::OnImportForHost { .. } => "on_import_for_host",
            RunnerEvent::OnNotImportForHost { .. } => "on_not_import_for_host",
        }
    }
}
