use crate::record::{EventCategory, EventRecord, LogAction, RecordStatus};
use chrono::Utc;
use sysinfo::System;
use uuid::Uuid;

const UNKNOWN_HOST: &str = "localhost";

/// State scoped to one execution run.
///
/// `session_id` and `host_identity` are fixed at construction; every record built
/// through [`Session::record`] carries them unchanged.
#[derive(Debug, Clone)]
pub struct Session {
    session_id: String,
    host_identity: String,
    playbook_name: String,
    error_count: u64,
}

impl Session {
    pub fn new(host_identity: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            host_identity: host_identity.into(),
            playbook_name: String::new(),
            error_count: 0,
        }
    }

    pub fn for_local_host() -> Self {
        Self::new(System::host_name().unwrap_or_else(|| UNKNOWN_HOST.to_string()))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn host_identity(&self) -> &str {
        &self.host_identity
    }

    pub fn playbook_name(&self) -> &str {
        &self.playbook_name
    }

    pub fn set_playbook_name(&mut self, playbook: impl Into<String>) {
        self.playbook_name = playbook.into();
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    /// `OK` iff no failure has been counted for this run.
    pub fn run_status(&self) -> RecordStatus {
        if self.error_count == 0 {
            RecordStatus::Ok
        } else {
            RecordStatus::Failed
        }
    }

    pub fn record(
        &self,
        log_action: LogAction,
        status: RecordStatus,
        event_category: EventCategory,
    ) -> EventRecord {
        EventRecord {
            log_action,
            status,
            host: self.host_identity.clone(),
            session_id: self.session_id.clone(),
            event_category,
            playbook_name: self.playbook_name.clone(),
            task_host: None,
            task_descriptor: None,
            result_payload: None,
            imported_file: None,
            missing_file: None,
            created_at: Utc::now(),
        }
    }
}
