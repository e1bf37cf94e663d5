use crate::exporters::log_sink::{format_log_line, LogSink};
use runlog_common::record::{EventRecord, Severity};

/// Prints each record as one JSON line; used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &EventRecord, severity: Severity) {
        match format_log_line(record, severity) {
            Ok(line) => println!("{}", line),
            Err(err) => tracing::warn!("Dropping record that could not be encoded: {}", err),
        }
    }
}
