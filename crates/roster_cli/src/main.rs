//! `roster` command line entry point.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use roster_core::{core_version, init_logging};
use roster_http::{load_config, RosterConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Student and study-group roster service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Print the roster core version.
    Version,
}

#[derive(Debug, clap::Args)]
struct ServeArgs {
    /// TOML config file. `ROSTER__*` env vars override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Listen port override.
    #[arg(long)]
    port: Option<u16>,
    /// SQLite database path override.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

impl ServeArgs {
    fn resolve(self) -> anyhow::Result<RosterConfig> {
        let mut config =
            load_config(self.config.as_deref()).context("failed to load configuration")?;
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = self.db {
            config.database.path = db;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Version => {
            println!("roster {}", core_version());
            Ok(())
        }
        Command::Serve(args) => {
            let config = args.resolve()?;
            init_logging(&config.logging.level, config.logging.target())
                .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
            roster_http::serve(config).await.context("server exited with error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn serve_flags_override_loaded_config() {
        let cli = Cli::parse_from(["roster", "serve", "--port", "9001", "--db", "/tmp/r.db"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.database.path, PathBuf::from("/tmp/r.db"));
    }

    #[test]
    fn version_takes_no_arguments() {
        assert!(Cli::try_parse_from(["roster", "version", "--port", "1"]).is_err());
        assert!(matches!(
            Cli::parse_from(["roster", "version"]).command,
            Command::Version
        ));
    }
}
