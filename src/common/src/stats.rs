use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-host counters, as summarized by the orchestration engine at the end of a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostSummary {
    pub ok: u64,
    pub changed: u64,
    pub failures: u64,
    pub skipped: u64,
    pub unreachable: u64,
    pub rescued: u64,
    pub ignored: u64,
}

/// Aggregate statistics for a run, keyed by host name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybookStats {
    #[serde(default)]
    pub processed: BTreeMap<String, HostSummary>,
}

impl PlaybookStats {
    pub fn summarize(&self, host: &str) -> HostSummary {
        self.processed.get(host).copied().unwrap_or_default()
    }

    /// Host name to summary mapping, built by summarizing every processed host.
    pub fn summarize_all(&self) -> BTreeMap<&str, HostSummary> {
        self.processed
            .keys()
            .map(|host| (host.as_str(), self.summarize(host)))
            .collect()
    }
}
