//! Eddy CLI - Command-line interface
//!
//! Runs the API server and gives shell access to the aggregation operations
//! and the stored provider list.

mod commands;

use clap::Parser;
use eddy_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "eddy")]
#[command(about = "Aggregating search front end for video content providers")]
struct Cli {
    /// Console log level
    #[arg(long, global = true, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), None)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    commands::handle_command(cli.command).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::commands::{Commands, SitesCommand};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_server_overrides() {
        let cli = Cli::try_parse_from([
            "eddy",
            "server",
            "--port",
            "8080",
            "--data-file",
            "/tmp/sites.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Server {
                port, data_file, host, ..
            } => {
                assert_eq!(port, Some(8080));
                assert_eq!(data_file.unwrap().to_str(), Some("/tmp/sites.json"));
                assert!(host.is_none());
            }
            _ => panic!("expected server command"),
        }
        assert_eq!(cli.log_level, CliLogLevel::Info);
    }

    #[test]
    fn test_parse_detail_and_sites() {
        let cli = Cli::try_parse_from(["eddy", "--log-level", "debug", "detail", "ffzy", "42"])
            .unwrap();
        assert_eq!(cli.log_level, CliLogLevel::Debug);
        assert!(matches!(
            cli.command,
            Commands::Detail { ref site_key, ref id, .. } if site_key == "ffzy" && id == "42"
        ));

        let cli = Cli::try_parse_from(["eddy", "sites", "import", "sites.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sites {
                command: SitesCommand::Import { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_search_requires_keyword() {
        assert!(Cli::try_parse_from(["eddy", "search"]).is_err());
    }
}
