//! Binary modules runnable by the orchestration engine.

pub mod datadog_tags;
pub mod echo_fields;
