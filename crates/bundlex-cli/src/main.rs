mod display;

use anyhow::{Context, Result};
use bundlex_core::{
    assemble, classify, resolve_credentials, restore_request, EventDescriptor, UnifiedBundle,
    UpstreamResponse,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "bundlex",
    version,
    about = "bundlex — Legacy bundle translation inspector",
    long_about = "Translate unified bundles into the legacy bundles that old integration scripts expect.\n\nUseful for checking exactly which keys a legacy script will see for a given event."
)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a unified bundle into the legacy bundle for an event
    Convert {
        /// Path to the unified bundle JSON file
        #[arg(short, long)]
        bundle: PathBuf,

        /// Event name, e.g. create.write or trigger.hook.subscribe.pre
        #[arg(short, long)]
        event: String,

        /// Event discriminator key (use "hook" for webhook catch)
        #[arg(short, long)]
        key: Option<String>,

        /// Upstream response status for post phases
        #[arg(long, requires = "content", conflicts_with = "response")]
        status: Option<u16>,

        /// Upstream response body for post phases
        #[arg(long, requires = "status")]
        content: Option<String>,

        /// Path to a JSON file with {"status": .., "content": ..}
        #[arg(long)]
        response: Option<PathBuf>,

        /// Path to a JSON array of records for search.resource events
        #[arg(long)]
        results: Option<PathBuf>,

        /// TOML config file with [oauth2] client credentials
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (json, text)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Show the category, phase and method for an event name
    Classify {
        /// Event name
        name: String,

        /// Event discriminator key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// List every event name the engine accepts
    Events,

    /// Convert a legacy request section back into request options
    Restore {
        /// Path to the legacy request JSON file
        path: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            bundle,
            event,
            key,
            status,
            content,
            response,
            results,
            config,
            format,
        } => {
            let response = match (status, content, response) {
                (Some(status), Some(content), _) => Some(UpstreamResponse { status, content }),
                (_, _, Some(path)) => Some(read_json(&path)?),
                _ => None,
            };
            let results = results.map(|path| read_json(&path)).transpose()?;
            let event = EventDescriptor {
                name: event,
                key,
                response,
                results,
            };
            cmd_convert(&bundle, &event, config.as_deref(), &format)
        }
        Commands::Classify { name, key } => cmd_classify(&name, key.as_deref()),
        Commands::Events => {
            display::print_event_catalog();
            Ok(())
        }
        Commands::Restore { path } => cmd_restore(&path),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "bundlex", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into())
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn cmd_convert(
    bundle_path: &Path,
    event: &EventDescriptor,
    config: Option<&Path>,
    format: &str,
) -> Result<()> {
    let bundle: UnifiedBundle = read_json(bundle_path)?;
    let credentials = resolve_credentials(config)?;
    if !credentials.is_complete() && event.name.starts_with("auth.oauth2.") {
        tracing::warn!("OAuth2 client credentials are not fully configured; oauth_data will contain nulls");
    }

    let legacy = assemble(&bundle, event, &credentials)
        .with_context(|| format!("Failed to translate event '{}'", event.name))?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&legacy)?;
            println!("{}", json);
        }
        "text" => display::print_legacy_bundle(&event.name, &legacy),
        other => anyhow::bail!("Unknown format '{}'. Expected 'json' or 'text'.", other),
    }

    Ok(())
}

fn cmd_classify(name: &str, key: Option<&str>) -> Result<()> {
    let classified = classify(name, key)?;
    display::print_classification(name, &classified);
    Ok(())
}

fn cmd_restore(path: &Path) -> Result<()> {
    let value: Value = read_json(path)?;
    let legacy: Map<String, Value> = match value {
        Value::Object(mut map) => match map.remove("request") {
            Some(Value::Object(request)) => request,
            Some(_) => anyhow::bail!("'request' in {} is not an object", path.display()),
            None => map,
        },
        _ => anyhow::bail!("{} must contain a JSON object", path.display()),
    };

    let restored = restore_request(&legacy);
    println!("{}", serde_json::to_string_pretty(&restored)?);
    Ok(())
}
