use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lineup_lens::analyze::{
    find_anticorrelated, find_co_starters, formation_profile, mine_formation_rules,
    profile_player, CoStarterQuery,
};
use lineup_lens::api::state::AppState;
use lineup_lens::config::AppConfig;
use lineup_lens::ingest::{self, LoadResult};
use lineup_lens::repository::LineupRepository;

#[derive(Parser)]
#[command(name = "lineup-lens")]
#[command(about = "Football lineup analytics: co-starters, formations, position patterns")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Override the teamsheet CSV path from the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Rank players who start together with the included set
    CoStarters {
        /// Team to analyze
        #[arg(long)]
        team: String,

        /// Player that must start (repeatable)
        #[arg(long = "include")]
        included: Vec<String>,

        /// Player that must not start (repeatable)
        #[arg(long = "exclude")]
        excluded: Vec<String>,

        /// Also report mean set-piece shares
        #[arg(long)]
        set_pieces: bool,

        /// Also print the anticorrelated ranking
        #[arg(long)]
        anti: bool,

        /// Restrict to a season code, e.g. 2324
        #[arg(long)]
        season: Option<u32>,
    },

    /// Profile a team's formation signatures
    Formations {
        #[arg(long)]
        team: String,

        #[arg(long)]
        season: Option<u32>,
    },

    /// Mine association rules over starting positions
    Rules {
        #[arg(long)]
        team: String,

        #[arg(long)]
        season: Option<u32>,
    },

    /// Profile one player's positions and opponents
    Player {
        #[arg(long)]
        team: String,

        /// Player name (case-insensitive substring match)
        #[arg(long)]
        player: String,

        #[arg(long)]
        season: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting lineup-lens v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match AppConfig::from_file(&PathBuf::from(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default config ({})", e);
            AppConfig::default()
        }
    };
    if let Some(data) = cli.data {
        config.data.teamsheets_path = data;
    }

    let repository = load_repository(&config)?;
    tracing::info!(records = repository.len(), "lineup table ready");

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(repository, config.analysis.clone());
            let app = lineup_lens::api::build_router(state);

            let addr = format!("{}:{}", host, port);
            tracing::info!("API server listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            axum::serve(listener, app).await?;
        }

        Commands::CoStarters {
            team,
            included,
            excluded,
            set_pieces,
            anti,
            season,
        } => {
            let repo = scoped(repository, season);
            let query = CoStarterQuery {
                team,
                included,
                excluded,
                set_pieces,
            };

            let report = find_co_starters(&repo, &query);
            println!("{}\n", report.summary);
            if report.rows.is_empty() {
                println!("No co-starters found.");
            } else {
                println!("{:<28} {:>8} {:>10}", "Player", "Starts", "Combo Freq");
                for row in &report.rows {
                    print!(
                        "{:<28} {:>8} {:>10}",
                        row.player, row.starts_together, row.combo_freq
                    );
                    if let Some(share) = &row.set_pieces {
                        print!(
                            "   FK {:>3}%  CK {:>3}%",
                            share.freekicks_pct, share.cornerkicks_pct
                        );
                    }
                    println!();
                }
            }

            if anti {
                let report = find_anticorrelated(&repo, &query);
                println!();
                if report.rows.is_empty() {
                    println!("Not enough common starts to determine anticorrelation.");
                } else {
                    println!("{:<28} {:>12}", "Player", "Starts Apart");
                    for row in &report.rows {
                        println!("{:<28} {:>12}", row.player, row.starts_apart);
                    }
                }
            }
        }

        Commands::Formations { team, season } => {
            let repo = scoped(repository, season);
            let rows = formation_profile(&repo, &team, config.analysis.formation_position_field);
            if rows.is_empty() {
                println!("No repeated formation signatures for {}.", team);
            } else {
                println!("{:<64} {:>6} {:>9}", "Signature", "Count", "Mean OOP");
                for row in &rows {
                    println!(
                        "{:<64} {:>6} {:>9}",
                        row.signature.join("-"),
                        row.count,
                        row.mean_oop.round()
                    );
                }
            }
        }

        Commands::Rules { team, season } => {
            let repo = scoped(repository, season);
            let rules = mine_formation_rules(&repo, &team, config.analysis.formation_position_field);
            if rules.is_empty() {
                println!("No association rules found for {}.", team);
            } else {
                println!(
                    "{:<32} {:<32} {:>8} {:>11} {:>7}",
                    "Antecedent", "Consequent", "Support", "Confidence", "Lift"
                );
                for rule in &rules {
                    println!(
                        "{:<32} {:<32} {:>8.2} {:>11.2} {:>7.2}",
                        rule.antecedent.join(","),
                        rule.consequent.join(","),
                        rule.support,
                        rule.confidence,
                        rule.lift
                    );
                }
            }
        }

        Commands::Player {
            team,
            player,
            season,
        } => {
            let repo = scoped(repository, season);
            let profile = profile_player(&repo, &team, &player, config.analysis.profile_position_field);

            if profile.matched_players.is_empty() {
                println!("No players matching '{}' for {}.", player, team);
                return Ok(());
            }
            println!("Matched: {}\n", profile.matched_players.join(", "));

            println!(
                "{:<10} {:>6} {:>6} {:>12}  {:>4}/{:<4}  Opponents",
                "Position", "Count", "Pct", "Most Recent", "Home", "Away"
            );
            for row in &profile.positions {
                println!(
                    "{:<10} {:>6} {:>6} {:>12}  {:>4}/{:<4}  {}",
                    row.position,
                    row.count,
                    row.percentage,
                    row.most_recent_date,
                    row.home_games,
                    row.away_games,
                    row.opponents.join(", ")
                );
            }

            println!("\n{:<24} {:>6} {:>6}  Positions", "Opponent", "Count", "Pct");
            for row in &profile.opponents {
                println!(
                    "{:<24} {:>6} {:>6}  {}",
                    row.opponent,
                    row.count,
                    row.percentage,
                    row.positions.join(", ")
                );
            }

            if !profile.non_starter_opponents.is_empty() {
                println!(
                    "\nOpponents faced without starting: {}",
                    profile.non_starter_opponents.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn load_repository(config: &AppConfig) -> Result<LineupRepository> {
    let LoadResult {
        mut records,
        rows_skipped,
    } = ingest::load_csv(&config.data.teamsheets_path).with_context(|| {
        format!(
            "Failed to load teamsheets from {}",
            config.data.teamsheets_path.display()
        )
    })?;
    if rows_skipped > 0 {
        tracing::warn!(rows_skipped, "some rows could not be parsed");
    }

    if config.data.exclude_goalkeepers {
        records = ingest::exclude_goalkeepers(records);
    }
    if !config.data.league.is_empty() {
        records = ingest::restrict_to_league_teams(records, &config.data.league);
    }

    Ok(LineupRepository::new(records))
}

fn scoped(repository: LineupRepository, season: Option<u32>) -> LineupRepository {
    match season {
        Some(season) => repository.filter_season(season),
        None => repository,
    }
}
