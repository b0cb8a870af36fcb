use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_tournament::api::state::{AppState, DynRepository};
use swiss_tournament::api::{build_router, cors_layer};
use swiss_tournament::calculate::PairingError;
use swiss_tournament::config::AppConfig;
use swiss_tournament::models::PlayerId;
use swiss_tournament::storage::{JsonlRepository, StorageConfig};
use swiss_tournament::tournament::{Tournament, TournamentError};

#[derive(Parser)]
#[command(name = "swiss")]
#[command(about = "Swiss-system tournament manager")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new player
    Register {
        /// Player's full name
        name: String,
    },

    /// Report the result of a match
    Report {
        /// ID of the winning player
        winner: PlayerId,

        /// ID of the losing player
        loser: PlayerId,
    },

    /// Show current standings, leader first
    Standings,

    /// Show pairings for the next round
    Pairings {
        /// Avoid pairing players who already met
        #[arg(long, overrides_with = "no_avoid_rematches")]
        avoid_rematches: bool,

        /// Allow rematches even if the config avoids them
        #[arg(long, overrides_with = "avoid_rematches")]
        no_avoid_rematches: bool,
    },

    /// Remove all match records
    ResetMatches,

    /// Remove all player records
    ResetPlayers,

    /// Show the number of registered players
    Count,

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting swiss v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command, config).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<TournamentError>() {
            Some(tournament_err) => {
                eprintln!("error: {}", describe_error(tournament_err));
                std::process::exit(exit_code(tournament_err));
            }
            None => Err(err),
        },
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<()> {
    let storage = StorageConfig::new(config.data_dir.clone());
    let mut tournament = Tournament::new(JsonlRepository::new(storage))
        .with_pairing_config(config.pairing.clone());

    match command {
        Commands::Register { name } => {
            let player = tournament.register_player(&name)?;
            println!("Registered {} with id {}", player.name, player.id);
        }
        Commands::Report { winner, loser } => {
            tournament.report_match(winner, loser)?;
            println!("Recorded: {} beat {}", winner, loser);
        }
        Commands::Standings => {
            let standings = tournament.standings()?;
            if standings.is_empty() {
                println!("No players registered.");
                return Ok(());
            }

            println!(
                "{:>4}  {:>5}  {:<30} {:>4} {:>6} {:>7} {:>6}",
                "Rank", "ID", "Name", "Wins", "Losses", "Matches", "Win%"
            );
            for (rank, s) in standings.iter().enumerate() {
                println!(
                    "{:>4}  {:>5}  {:<30} {:>4} {:>6} {:>7} {:>5.1}%",
                    rank + 1,
                    s.player_id,
                    s.name,
                    s.wins,
                    s.losses(),
                    s.matches_played,
                    s.win_rate() * 100.0
                );
            }
        }
        Commands::Pairings {
            avoid_rematches,
            no_avoid_rematches,
        } => {
            let avoid = resolve_avoid_rematches(
                avoid_rematches,
                no_avoid_rematches,
                tournament.pairing_config().avoid_rematches,
            );
            let pairings = tournament.swiss_pairings_with(avoid)?;

            println!("=== Next Round ({} matches) ===\n", pairings.len());
            for (table, p) in pairings.iter().enumerate() {
                println!(
                    "  Table {:>3}: [{}] {} vs [{}] {}",
                    table + 1,
                    p.player1_id,
                    p.player1_name,
                    p.player2_id,
                    p.player2_name
                );
            }
        }
        Commands::ResetMatches => {
            tournament.delete_matches()?;
            println!("All matches removed.");
        }
        Commands::ResetPlayers => {
            tournament.delete_players()?;
            println!("All players removed.");
        }
        Commands::Count => {
            println!("{}", tournament.count_players()?);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let repo: DynRepository = Box::new(JsonlRepository::new(StorageConfig::new(
                config.data_dir.clone(),
            )));
            let state = AppState::new(
                Tournament::new(repo).with_pairing_config(config.pairing.clone()),
            );
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Command-line flags win over the configured engine; the last flag given wins.
fn resolve_avoid_rematches(on: bool, off: bool, configured: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}

/// User-facing message for each failure kind.
fn describe_error(err: &TournamentError) -> String {
    match err {
        TournamentError::DataAccess(e) => format!(
            "could not access tournament data ({}). Check that the data directory exists and is writable.",
            e
        ),
        TournamentError::Pairing(PairingError::OddPlayerCount(n)) => format!(
            "{} players are registered; pairing needs an even number. Register or remove one player.",
            n
        ),
        TournamentError::Pairing(PairingError::InsufficientPlayers(n)) => format!(
            "only {} player(s) registered; at least 2 are needed to pair a round.",
            n
        ),
        TournamentError::InvalidMatchOutcome(reason) => format!(
            "invalid match result: {}. Use `swiss standings` to list player ids.",
            reason
        ),
        TournamentError::InvalidPlayerName => "player name must not be empty.".to_string(),
    }
}

fn exit_code(err: &TournamentError) -> i32 {
    match err {
        TournamentError::DataAccess(_) => 74,
        TournamentError::Pairing(_) => 3,
        TournamentError::InvalidMatchOutcome(_) | TournamentError::InvalidPlayerName => 2,
    }
}
