pub mod constants;
pub mod event;
pub mod module;
pub mod record;
pub mod results;
pub mod session;
pub mod stats;
