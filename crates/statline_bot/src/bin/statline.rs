//! Statline - sports stats bot.
//!
//! `serve` runs the live poller with its schedules. The other subcommands
//! answer one bot command and exit.

use chrono::Local;
use clap::{Parser, Subcommand};
use statline_bot::{
    BotServer, LogPresenter, ObservabilityConfig, StatlineConfig, StatsService,
    init_observability, user_message,
};
use statline_client::{AuthScheme, HttpTransport, Transport};
use statline_core::League;
use statline_error::StatlineResult;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "statline")]
#[command(about = "Statline - sports stats and live projection alerts")]
#[command(version)]
struct Args {
    /// Configuration file layered over the bundled defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    /// Stats provider API key
    #[arg(long, env = "BALLDONTLIE_API_KEY", hide_env_values = true)]
    stats_key: Option<String>,

    /// Live feed API key
    #[arg(long, env = "MYSPORTSFEEDS_API_KEY", hide_env_values = true)]
    feed_key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the live poller until interrupted
    Serve,
    /// Season figures of a player
    Season {
        /// League (nba, nfl, mlb)
        league: League,
        /// Player name
        player: String,
        /// Season; defaults to the current one
        #[arg(long)]
        season: Option<i32>,
    },
    /// Average of one stat over a player's last games
    Recent {
        /// League (nba, nfl, mlb)
        league: League,
        /// Player name
        player: String,
        /// Stat key, e.g. pts or pts+reb+ast
        stat: String,
        /// Games in the window
        #[arg(long, default_value_t = 5)]
        games: usize,
    },
    /// League leaders
    Leaders {
        /// League (nba, nfl, mlb)
        league: League,
        /// Season; defaults to the current one
        #[arg(long)]
        season: Option<i32>,
    },
    /// A player's live figures against their projections
    Prop {
        /// League (nba, nfl, mlb)
        league: League,
        /// Player name
        player: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = init_observability(
        &ObservabilityConfig::new()
            .with_log_level(args.log_level.clone())
            .with_json_logs(args.json_logs),
    ) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> StatlineResult<()> {
    let config = match &args.config {
        Some(path) => StatlineConfig::from_file(path)?,
        None => StatlineConfig::load()?,
    };
    info!(leagues = ?config.live().leagues(), "Configuration loaded");

    let service = Arc::new(StatsService::from_config(
        &config,
        transport("BALLDONTLIE_API_KEY", args.stats_key.map(AuthScheme::api_key)),
        transport("MYSPORTSFEEDS_API_KEY", args.feed_key.map(AuthScheme::feed_key)),
    ));

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let presenter = Arc::new(LogPresenter::new(config.channels().clone()));
            let server = BotServer::new(config, service, presenter);
            if let Err(e) = server.start().await {
                error!(error = %e, "Live poller stopped unexpectedly");
            }
        }
        Command::Season {
            league,
            player,
            season,
        } => {
            let player = service.find_player(league, &player).await?;
            let season = season.unwrap_or_else(|| league.current_season());
            let summary = service.season_summary(league, player.id, season).await?;
            println!(
                "{} ({}, {} {}): {} games",
                player.name,
                summary.aggregate.role,
                league.abbreviation(),
                season,
                summary.aggregate.games
            );
            for line in summary.lines {
                match line.value {
                    Some(value) => println!("  {:<8} {:.1}", line.label, value),
                    None => println!("  {:<8} -", line.label),
                }
            }
        }
        Command::Recent {
            league,
            player,
            stat,
            games,
        } => {
            let player = service.find_player(league, &player).await?;
            let form = service.recent_form(league, player.id, &stat, games).await?;
            println!(
                "{}: {:.2} {} over the last {} games",
                form.player.name, form.value, form.stat, form.games
            );
        }
        Command::Leaders { league, season } => {
            let season = season.unwrap_or_else(|| league.current_season());
            let board = service.league_leaders(league, season).await?;
            println!("{} {} leaders", league.abbreviation(), season);
            for category in &board.categories {
                println!("{}", category.category);
                for entry in &category.entries {
                    println!("  {}. {} {:.3}", entry.rank, entry.player.name, entry.value);
                }
            }
        }
        Command::Prop { league, player } => {
            let player = service.find_player(league, &player).await?;
            let prop = service
                .player_prop(league, player.id, Local::now().date_naive())
                .await?;
            println!("{} (game {})", prop.player.name, prop.game_id);
            for row in prop.rows {
                println!(
                    "  {:<12} {} / {} {}",
                    row.label, row.live, row.projected, row.tier
                );
            }
        }
    }
    Ok(())
}

fn transport(variable: &str, auth: Option<AuthScheme>) -> Arc<dyn Transport> {
    let auth = auth.unwrap_or_else(|| {
        warn!(variable, "API key not set, sending unauthenticated requests");
        AuthScheme::None
    });
    Arc::new(HttpTransport::new(auth))
}
