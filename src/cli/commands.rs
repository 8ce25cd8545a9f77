use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `checkin` - scripted daily check-ins across proxy hosts and servers.
#[derive(Parser, Debug)]
#[command(name = "checkin")]
#[command(version)]
#[command(about = "Run site check-ins for every stored account.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.checkin/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured sites
    Run {
        /// Only run the site with this name
        #[arg(long)]
        site: Option<String>,
    },

    /// Print the detected host environment
    Env,

    /// Read or write the key-value store
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Print the value at ADDRESS (`key` or `@container.path`)
    Get { address: String },

    /// Write VALUE at ADDRESS
    Set { address: String, value: String },
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
    fn run_accepts_site_filter() {
        let cli = Cli::parse_from(["checkin", "run", "--site", "demo"]);
        assert!(matches!(cli.command, Commands::Run { site: Some(ref s) } if s == "demo"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn store_set_takes_address_and_value() {
        let cli = Cli::parse_from([
            "checkin",
            "--config",
            "/tmp/c.toml",
            "store",
            "set",
            "@box.users[0].token",
            "abc",
        ]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
        match cli.command {
            Commands::Store {
                command: StoreCommands::Set { address, value },
            } => {
                assert_eq!(address, "@box.users[0].token");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
