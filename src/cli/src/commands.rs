use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[clap(
    name = "runlog",
    about = "Ships playbook run events to CloudWatch Logs and runs the bundled Ansible modules",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[clap(long, global = true)]
    pub config: Option<String>,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Forward runner events (one JSON object per line) to CloudWatch Logs
    Forward {
        /// Read events from this file instead of stdin
        #[clap(long, short)]
        input: Option<PathBuf>,
        /// Print the records on stdout instead of sending them
        #[clap(long)]
        dry_run: bool,
    },

    /// Run the datadog_tags module with an Ansible arguments file
    Tags { args_file: PathBuf },

    /// Run the echo_fields module with an Ansible arguments file
    Echo { args_file: PathBuf },

    /// Shows the resolved configuration
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["runlog", "forward", "--dry-run", "--config", "runlog.toml"]);

        assert_eq!(cli.config.as_deref(), Some("runlog.toml"));
        match cli.command {
            Commands::Forward { input, dry_run } => {
                assert!(input.is_none());
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
