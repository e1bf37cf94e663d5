use crate::config_manager::Config;
use crate::exporters::{CloudWatchSink, LogSink, LogSinkEnum};
use runlog_aws::{resolve_available_aws_config, CloudWatchLogsClient};
use runlog_common::event::{RunnerEvent, TaskResult};
use runlog_common::record::{EventCategory, EventRecord, LogAction, RecordStatus, Severity};
use runlog_common::results::{dump_results, UNSERIALIZABLE_PLACEHOLDER};
use runlog_common::session::Session;
use runlog_common::stats::{HostSummary, PlaybookStats};
use std::collections::BTreeMap;
use tracing::{debug, warn};

struct ForwarderState<S> {
    sink: S,
    session: Session,
}

/// Turns the engine's lifecycle events into records and writes them to a sink.
///
/// A forwarder without a sink is disabled: every event method is a no-op.
pub struct EventForwarder<S: LogSink> {
    state: Option<ForwarderState<S>>,
}

impl EventForwarder<LogSinkEnum> {
    /// Builds a CloudWatch-backed forwarder. Never fails: when no credentials can be
    /// resolved it warns once and returns a disabled forwarder.
    pub async fn connect(config: &Config) -> Self {
        let Some(sdk_config) =
            resolve_available_aws_config(config.aws_init_type(), &config.aws_region).await
        else {
            warn!(
                "CloudWatch Logs is unavailable (no usable AWS credentials for {}); event forwarding is disabled",
                config.aws_init_type()
            );
            return Self::disabled();
        };

        let sink = CloudWatchSink::spawn(
            CloudWatchLogsClient::new(&sdk_config),
            config.log_group.clone(),
            config.log_stream.clone(),
            config.batch_size,
        );
        Self::new(LogSinkEnum::CloudWatch(sink), Session::for_local_host())
    }

    /// Flushes and releases the sink, if any.
    pub async fn close(self) {
        if let Some(sink) = self.into_sink() {
            debug!("Closing {}", sink.variant_name());
            sink.close().await;
        }
    }
}

impl<S: LogSink> EventForwarder<S> {
    pub fn new(sink: S, session: Session) -> Self {
        Self {
            state: Some(ForwarderState { sink, session }),
        }
    }

    pub fn disabled() -> Self {
        Self { state: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.as_ref().map(|state| &state.session)
    }

    pub fn into_sink(self) -> Option<S> {
        self.state.map(|state| state.sink)
    }

    pub fn handle(&mut self, event: &RunnerEvent) {
        match event {
            RunnerEvent::OnStart { playbook } => self.on_start(playbook),
            RunnerEvent::OnStats { stats } => self.on_stats(stats),
            RunnerEvent::OnOk(result) => self.on_ok(result),
            RunnerEvent::OnSkipped(result) => self.on_skipped(result),
            RunnerEvent::OnFailed(result) => self.on_failed(result),
            RunnerEvent::OnUnreachable(result) => self.on_unreachable(result),
            RunnerEvent::OnAsyncFailed(result) => self.on_async_failed(result),
            RunnerEvent::OnImportForHost {
                result,
                imported_file,
            } => self.on_import_for_host(result, imported_file),
            RunnerEvent::OnNotImportForHost {
                result,
                missing_file,
            } => self.on_not_import_for_host(result, missing_file),
        }
    }

    pub fn on_start(&mut self, playbook: &str) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.session.set_playbook_name(playbook);

        let record = state
            .session
            .record(LogAction::Start, RecordStatus::Ok, EventCategory::Start);
        emit(state, record, Severity::Info);
    }

    pub fn on_stats(&mut self, stats: &PlaybookStats) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let mut record = state.session.record(
            LogAction::Stats,
            state.session.run_status(),
            EventCategory::Finish,
        );
        record.result_payload = Some(dump_summary(&stats.summarize_all()));
        emit(state, record, Severity::Info);
    }

    pub fn on_ok(&mut self, result: &TaskResult) {
        self.task_event(LogAction::Ok, RecordStatus::Ok, result, true);
    }

    pub fn on_skipped(&mut self, result: &TaskResult) {
        self.task_event(LogAction::Skipped, RecordStatus::Skipped, result, false);
    }

    pub fn on_failed(&mut self, result: &TaskResult) {
        self.count_error();
        self.task_event(LogAction::Failed, RecordStatus::Failed, result, true);
    }

    /// Logged at error severity but, unlike failures, not counted against the run.
    pub fn on_unreachable(&mut self, result: &TaskResult) {
        self.task_event(LogAction::Unreachable, RecordStatus::Unreachable, result, true);
    }

    pub fn on_async_failed(&mut self, result: &TaskResult) {
        self.count_error();
        self.task_event(LogAction::AsyncFailed, RecordStatus::Failed, result, true);
    }

    pub fn on_import_for_host(&mut self, result: &TaskResult, imported_file: &str) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let mut record =
            state
                .session
                .record(LogAction::Import, RecordStatus::Imported, EventCategory::Import);
        record.task_host = Some(result.host.clone());
        record.imported_file = Some(imported_file.to_string());
        emit(state, record, Severity::Info);
    }

    pub fn on_not_import_for_host(&mut self, result: &TaskResult, missing_file: &str) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let mut record = state.session.record(
            LogAction::Import,
            RecordStatus::NotImported,
            EventCategory::Import,
        );
        record.task_host = Some(result.host.clone());
        record.missing_file = Some(missing_file.to_string());
        emit(state, record, Severity::Info);
    }

    fn count_error(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.session.record_error();
        }
    }

    fn task_event(
        &mut self,
        action: LogAction,
        status: RecordStatus,
        result: &TaskResult,
        with_payload: bool,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let mut record = state.session.record(action, status, EventCategory::Task);
        record.task_host = Some(result.host.clone());
        record.task_descriptor = Some(result.task.clone());
        if with_payload {
            record.result_payload = Some(dump_results(&result.result));
        }
        emit(state, record, severity_for(status));
    }
}

/// Host names are data here, so the summary is serialized as is rather than cleaned
/// like a task result.
fn dump_summary(summary: &BTreeMap<&str, HostSummary>) -> String {
    serde_json::to_string(summary).unwrap_or_else(|err| {
        warn!("Could not serialize run summary: {}", err);
        UNSERIALIZABLE_PLACEHOLDER.to_string()
    })
}

fn severity_for(status: RecordStatus) -> Severity {
    match status {
        RecordStatus::Failed | RecordStatus::Unreachable => Severity::Error,
        _ => Severity::Info,
    }
}

fn emit<S: LogSink>(state: &ForwarderState<S>, record: EventRecord, severity: Severity) {
    debug!(
        "Forwarding {:?} record for session {}",
        record.log_action, record.session_id
    );
    state.sink.write(&record, severity);
}
