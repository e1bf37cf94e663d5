pub mod config_manager;
pub mod exporters;
pub mod forwarder;
pub mod modules;
pub mod tags;

pub use forwarder::EventForwarder;
