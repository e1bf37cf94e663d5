use runlog_client::modules::echo_fields;
use runlog_common::module::ModuleResponse;

fn main() {
    let Some(args_file) = std::env::args_os().nth(1) else {
        std::process::exit(ModuleResponse::fail("usage: echo_fields <args-file>").emit());
    };

    std::process::exit(echo_fields::run_from_file(args_file).emit());
}
