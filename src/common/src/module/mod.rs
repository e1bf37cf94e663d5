//! The binary-module protocol: the orchestration engine runs `<module> <args-file>`,
//! where the file holds a JSON object of parameters, and reads one JSON object back
//! from stdout.

mod args;
mod response;

pub use args::{coerce_str, load_args, parse_args, ModuleError, ModuleInvocation, ModuleParams};
pub use response::ModuleResponse;
