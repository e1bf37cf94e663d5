use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LogAction {
    #[serde(rename = "ansible start")]
    Start,
    #[serde(rename = "ansible stats")]
    Stats,
    #[serde(rename = "ansible ok")]
    Ok,
    #[serde(rename = "ansible skipped")]
    Skipped,
    #[serde(rename = "ansible import")]
    Import,
    #[serde(rename = "ansible failed")]
    Failed,
    #[serde(rename = "ansible unreachable")]
    Unreachable,
    #[serde(rename = "ansible async")]
    AsyncFailed,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RecordStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "SKIPPED")]
    Skipped,
    #[serde(rename = "UNREACHABLE")]
    Unreachable,
    #[serde(rename = "IMPORTED")]
    Imported,
    #[serde(rename = "NOT IMPORTED")]
    NotImported,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Ok => write!(f, "OK"),
            RecordStatus::Failed => write!(f, "FAILED"),
            RecordStatus::Skipped => write!(f, "SKIPPED"),
            RecordStatus::Unreachable => write!(f, "UNREACHABLE"),
            RecordStatus::Imported => write!(f, "IMPORTED"),
            RecordStatus::NotImported => write!(f, "NOT IMPORTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Start,
    Task,
    Finish,
    Import,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// One structured record forwarded to the log stream.
///
/// Wire names match the keys the CloudWatch dashboards already query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventRecord {
    pub log_action: LogAction,
    pub status: RecordStatus,
    pub host: String,
    #[serde(rename = "session")]
    pub session_id: String,
    #[serde(rename = "ansible_type")]
    pub event_category: EventCategory,
    #[serde(rename = "ansible_playbook")]
    pub playbook_name: String,

    #[serde(rename = "ansible_host", skip_serializing_if = "Option::is_none")]
    pub task_host: Option<String>,
    #[serde(rename = "ansible_task", skip_serializing_if = "Option::is_none")]
    pub task_descriptor: Option<serde_json::Value>,
    #[serde(rename = "ansible_result", skip_serializing_if = "Option::is_none")]
    pub result_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_file: Option<String>,

    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> EventRecord {
        EventRecord {
            log_action: LogAction::Import,
            status: RecordStatus::NotImported,
            host: "control".into(),
            session_id: "abc".into(),
            event_category: EventCategory::Import,
            playbook_name: "site.yml".into(),
            task_host: Some("web1".into()),
            task_descriptor: None,
            result_payload: None,
            imported_file: None,
            missing_file: Some("vars/missing.yml".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn serializes_with_wire_names_and_omits_empty_fields() {
        let value = serde_json::to_value(record()).unwrap();

        assert_eq!(
            value,
            json!({
                "log_action": "ansible import",
                "status": "NOT IMPORTED",
                "host": "control",
                "session": "abc",
                "ansible_type": "import",
                "ansible_playbook": "site.yml",
                "ansible_host": "web1",
                "missing_file": "vars/missing.yml",
            })
        );
    }

    #[test]
    fn status_display_matches_wire_value() {
        for status in [
            RecordStatus::Ok,
            RecordStatus::Failed,
            RecordStatus::Skipped,
            RecordStatus::Unreachable,
            RecordStatus::Imported,
            RecordStatus::NotImported,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                json!(status.to_string())
            );
        }
    }
}
