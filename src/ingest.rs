//! CSV loading and schema normalization.
//!
//! The loader owns everything the analyzers must not care about: header
//! validation, column-name normalization, the composite `game_id`, display
//! labels, and the goalkeeper/league pre-filters. Analyzers receive records
//! already conforming to the schema.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::LineupRecord;

/// Columns every teamsheet export must carry (compared lowercase).
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "season",
    "game",
    "team",
    "opponent",
    "home_team",
    "away_team",
    "player",
    "position",
    "most_common_position",
    "new_position",
    "is_starter",
    "is_oop",
    "league",
    "date",
];

/// Loader errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

/// Result of loading one teamsheet CSV.
#[derive(Debug)]
pub struct LoadResult {
    pub records: Vec<LineupRecord>,
    /// Rows dropped because a field failed to parse.
    pub rows_skipped: usize,
}

/// Load lineup records from a teamsheet CSV file.
///
/// Headers are matched case-insensitively. Missing required columns surface
/// as [`IngestError::SchemaMismatch`] naming every absent field; rows with
/// unparseable values are skipped with a warning, not fatal.
pub fn load_csv(path: &Path) -> Result<LoadResult, IngestError> {
    info!(path = %path.display(), "loading teamsheet CSV");
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::SchemaMismatch { missing });
    }

    let col = |name: &str| index[name];
    let minutes_col = index.get("minutes_played").copied();
    let freekicks_col = index.get("freekicks").copied();
    let cornerkicks_col = index.get("cornerkicks").copied();

    let mut records = Vec::new();
    let mut rows_skipped = 0usize;

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or("").trim();

        let parsed = (|| -> Option<LineupRecord> {
            let season: u32 = field(col("season")).parse().ok()?;
            let game = field(col("game"));
            Some(LineupRecord {
                game_id: format!("{}:{}", season, game),
                team: field(col("team")).to_string(),
                opponent: field(col("opponent")).to_string(),
                home_team: field(col("home_team")).to_string(),
                away_team: field(col("away_team")).to_string(),
                player: field(col("player")).to_string(),
                position: field(col("position")).to_string(),
                most_common_position: field(col("most_common_position")).to_string(),
                new_position: field(col("new_position")).to_string(),
                is_starter: parse_flag(field(col("is_starter")))?,
                is_oop: parse_flag(field(col("is_oop")))?,
                season,
                league: field(col("league")).to_string(),
                date: NaiveDate::parse_from_str(field(col("date")), "%Y-%m-%d").ok()?,
                minutes_played: minutes_col.map_or(Some(0), |i| parse_count(field(i)))?,
                freekicks: freekicks_col.map_or(Some(0), |i| parse_count(field(i)))?,
                cornerkicks: cornerkicks_col.map_or(Some(0), |i| parse_count(field(i)))?,
            })
        })();

        match parsed {
            Some(record) => records.push(record),
            None => {
                warn!(line = line + 2, "skipping unparseable row");
                rows_skipped += 1;
            }
        }
    }

    info!(
        loaded = records.len(),
        skipped = rows_skipped,
        "teamsheet CSV loaded"
    );
    Ok(LoadResult {
        records,
        rows_skipped,
    })
}

/// Drop goalkeeper rows; the formation analyses cover the ten outfield
/// starters only.
pub fn exclude_goalkeepers(records: Vec<LineupRecord>) -> Vec<LineupRecord> {
    records.into_iter().filter(|r| r.position != "GK").collect()
}

/// Keep records for teams that appear in the given league (a team's cup
/// games stay in; teams outside the league drop entirely).
pub fn restrict_to_league_teams(records: Vec<LineupRecord>, league: &str) -> Vec<LineupRecord> {
    let teams: HashSet<String> = records
        .iter()
        .filter(|r| r.league == league)
        .map(|r| r.team.clone())
        .collect();
    records
        .into_iter()
        .filter(|r| teams.contains(&r.team))
        .collect()
}

/// Boolean flags arrive as True/False or 0/1 depending on the exporter.
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" | "" => Some(false),
        _ => None,
    }
}

/// Counts sometimes arrive as floats ("3.0"); truncate them to integers.
fn parse_count(value: &str) -> Option<u32> {
    if value.is_empty() {
        return Some(0);
    }
    value
        .parse::<u32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|f| f.max(0.0) as u32))
}
