//! ctxscout CLI entry point.
//!
//! Commands:
//! - `search`: Quick search
//! - `deep`: Deep multi-lane search
//! - `fetch`: Context for one URL
//! - `smart`: Context for a URL and the pages it links to
//! - `tools`: List tool definitions
//! - `call`: Invoke a tool by name with JSON arguments
//! - `config`: Show, locate or check configuration
//!
//! Envelopes go to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ctxscout",
    about = "ctxscout: grounded web and repository context",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quick search: one backend query, optional page context
    Search(commands::search::SearchArgs),

    /// Deep search: every query in every category lane
    Deep(commands::deep::DeepArgs),

    /// Fetch readable context for one URL
    Fetch {
        /// The page to fetch
        url: String,
    },

    /// Fetch a URL plus a bounded set of related pages
    Smart(commands::smart::SmartArgs),

    /// Print the tool catalog
    Tools,

    /// Call a tool by name
    Call {
        /// Tool name, e.g. search_quick
        name: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },

    /// Configuration management
    Config {
        /// Print the config file path
        #[arg(long)]
        path: bool,

        /// Print the default config as TOML
        #[arg(long, conflicts_with = "path")]
        default: bool,

        /// Validate the config and probe the search backend
        #[arg(long, conflicts_with_all = ["path", "default"])]
        check: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => commands::search::run(args).await?,
        Commands::Deep(args) => commands::deep::run(args).await?,
        Commands::Fetch { url } => commands::fetch::run(url).await?,
        Commands::Smart(args) => commands::smart::run(args).await?,
        Commands::Tools => commands::tools::list().await?,
        Commands::Call { name, arguments } => commands::tools::call(name, arguments).await?,
        Commands::Config {
            path,
            default,
            check,
        } => {
            if path {
                commands::config_cmd::path().await?
            } else if default {
                commands::config_cmd::default().await?
            } else if check {
                commands::config_cmd::check().await?
            } else {
                commands::config_cmd::show().await?
            }
        }
    }

    Ok(())
}
