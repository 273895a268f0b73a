//! CLI argument definitions for mpsettings.

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;

/// mpsettings - Inspect and change multipass client and daemon settings.
#[derive(Parser, Debug)]
#[command(name = "mpsettings")]
#[command(
    author,
    version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("MPS_GIT_COMMIT"),
        ", built ",
        env!("MPS_BUILD_TIMESTAMP"),
        ")"
    ),
    about = "Inspect and change multipass client and daemon settings",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Which settings to operate on
    #[arg(
        short,
        long,
        global = true,
        env = "MPSETTINGS_ROLE",
        value_enum,
        default_value_t = Role::Client
    )]
    pub role: Role,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings role: the interactive client or the background daemon.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Client settings (`client.*`)
    Client,
    /// Daemon settings (`local.*`)
    Daemon,
}

impl Role {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Daemon => "daemon",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get the effective value of a setting
    Get {
        /// Setting key (e.g., client.primary-name)
        key: String,
    },

    /// Set a setting
    Set {
        /// Setting key (e.g., local.driver)
        key: String,
        /// New value
        value: String,
    },

    /// List every recognized setting with its effective value
    List,

    /// List recognized setting keys
    Keys,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults_to_client() {
        let cli = Cli::try_parse_from(["mpsettings", "get", "client.primary-name"]).unwrap();
        assert_eq!(cli.role, Role::Client);
        assert!(!cli.human_readable);
        assert!(matches!(cli.command, Commands::Get { ref key } if key == "client.primary-name"));
    }

    #[test]
    fn test_parse_daemon_set() {
        let cli = Cli::try_parse_from([
            "mpsettings",
            "set",
            "local.driver",
            "lxd",
            "--role",
            "daemon",
            "-H",
        ])
        .unwrap();
        assert_eq!(cli.role, Role::Daemon);
        assert!(cli.human_readable);
        assert!(matches!(
            cli.command,
            Commands::Set { ref key, ref value } if key == "local.driver" && value == "lxd"
        ));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Client.to_string(), "client");
        assert_eq!(Role::Daemon.to_string(), "daemon");
    }
}
