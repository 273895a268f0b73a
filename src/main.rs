//! mpsettings CLI - Inspect and change multipass client and daemon settings.

use clap::Parser;
use multipass_settings::cli::{Cli, Commands};
use multipass_settings::commands::{self, Output};
use multipass_settings::platform::HostPlatform;
use multipass_settings::store::FileStoreProvider;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity (tracing `EnvFilter` syntax).
const LOG_ENV: &str = "MPSETTINGS_LOG";

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_logging();

    if let Err(e) = run_command(cli) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr so that stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_command(cli: Cli) -> Result<(), multipass_settings::Error> {
    let human = cli.human_readable;
    let registry =
        commands::open_registry(cli.role, &HostPlatform::new(), Arc::new(FileStoreProvider))?;

    match cli.command {
        Commands::Get { key } => {
            let result = commands::settings_get(&registry, &key)?;
            output(&result, human);
        }
        Commands::Set { key, value } => {
            let result = commands::settings_set(&registry, &key, &value)?;
            output(&result, human);
        }
        Commands::List => {
            let result = commands::settings_list(&registry)?;
            output(&result, human);
        }
        Commands::Keys => {
            let result = commands::settings_keys(&registry);
            output(&result, human);
        }
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
