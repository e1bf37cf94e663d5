use runlog_client::modules::datadog_tags;
use runlog_common::module::ModuleResponse;

fn main() {
    let Some(args_file) = std::env::args_os().nth(1) else {
        std::process::exit(ModuleResponse::fail("usage: datadog_tags <args-file>").emit());
    };

    let response = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime.block_on(datadog_tags::run_from_file(args_file)),
        Err(err) => ModuleResponse::fail(format!("Failed to start async runtime: {}", err)),
    };
    std::process::exit(response.emit());
}
