use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pathfinder::cli;
use pathfinder::cli::serve::ServeOverrides;

#[derive(Parser)]
#[command(name = "pathfinder", version)]
#[command(about = "Personalized career roadmaps from a short profile form", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the roadmap form endpoints over HTTP
    Serve {
        /// Path to config file (defaults to ./pathfinder.toml or ~/.config/pathfinder/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Bind address (default: from config, 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (default: from config, 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Override LLM model (e.g., "gpt-4o-mini")
        #[arg(long)]
        model: Option<String>,

        /// Directory for the submission CSV logs
        #[arg(long)]
        submissions_dir: Option<String>,

        /// Answer with a canned roadmap instead of calling the model
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and credential lookup without calling the model
    ConfigCheck {
        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            model,
            submissions_dir,
            dry_run,
        } => {
            let overrides = ServeOverrides {
                host,
                port,
                model,
                submissions_dir,
            };
            cli::serve::run(config, overrides, dry_run).await?;
        }
        Commands::ConfigCheck { config } => {
            cli::config_check::run(config)?;
        }
    }

    Ok(())
}
