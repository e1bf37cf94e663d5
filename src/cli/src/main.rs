use anyhow::Context;
use runlog_cli::process_command::process_cli;

pub fn main() -> anyhow::Result<()> {
    let code = process_cli().context("Can't process CLI command")?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
