use crate::exporters::cloudwatch::CloudWatchSink;
use crate::exporters::stdout::StdoutSink;
use runlog_common::record::{EventRecord, Severity};
use serde::Serialize;

/// Destination for event records.
///
/// `write` is called synchronously for every event and must not fail the caller;
/// buffering, retries and delivery are the sink's own concern.
pub trait LogSink {
    fn write(&self, record: &EventRecord, severity: Severity);
}

#[derive(Serialize)]
struct LogLine<'a> {
    level: &'a str,
    #[serde(flatten)]
    record: &'a EventRecord,
}

/// The JSON message body shipped for a record, with its severity as `level`.
pub fn format_log_line(record: &EventRecord, severity: Severity) -> serde_json::Result<String> {
    serde_json::to_string(&LogLine {
        level: severity.as_str(),
        record,
    })
}

pub enum LogSinkEnum {
    CloudWatch(CloudWatchSink),
    Stdout(StdoutSink),
}

impl LogSink for LogSinkEnum {
    fn write(&self, record: &EventRecord, severity: Severity) {
        match self {
            LogSinkEnum::CloudWatch(sink) => sink.write(record, severity),
            LogSinkEnum::Stdout(sink) => sink.write(record, severity),
        }
    }
}

impl LogSinkEnum {
    /// Flushes whatever the sink still buffers.
    pub async fn close(self) {
        match self {
            LogSinkEnum::CloudWatch(sink) => sink.shutdown().await,
            LogSinkEnum::Stdout(_) => {}
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            LogSinkEnum::CloudWatch(_) => "CloudWatchSink",
            LogSinkEnum::Stdout(_) => "StdoutSink",
        }
    }
}
