mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oddeven")]
#[command(about = "Odds-and-Evens commit-reveal game engine CLI")]
#[command(version)]
struct Cli {
    /// Engine config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay rollup requests, one JSON object per line
    Replay {
        /// Input file, `-` for stdin
        input: PathBuf,
        /// Print notices and reports hex encoded
        #[arg(long)]
        hex: bool,
        /// List open games after the replay
        #[arg(short, long)]
        list: bool,
    },
    /// Compute the commitment for an action
    Commit {
        /// The number to play
        #[arg(allow_negative_numbers = true)]
        action: i64,
        /// Nonce (random when omitted)
        #[arg(short, long)]
        nonce: Option<String>,
    },
    /// Show the game id of two players
    GameId {
        /// First player address
        player_a: String,
        /// Second player address
        player_b: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "oddeven={},oddeven_engine={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match commands::load_config(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Replay { input, hex, list } => commands::replay(config, &input, hex, list).await,
        Commands::Commit { action, nonce } => commands::commit(action, nonce),
        Commands::GameId { player_a, player_b } => {
            commands::show_game_id(config, &player_a, &player_b)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
