//! Per-player position and opponent profiles.
//!
//! Player matching is a case-insensitive substring match against the player
//! column. When the query matches several distinct players the profile
//! aggregates across all of them; that is the accepted contract, not a bug.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::analyze::format_percent;
use crate::models::{LineupRecord, PositionField};
use crate::repository::LineupRepository;

/// One position the matched player(s) started in.
#[derive(Debug, Clone, Serialize)]
pub struct PositionRow {
    pub position: String,
    pub count: usize,
    /// Share of the player's total starts, e.g. "40%".
    pub percentage: String,
    pub most_recent_date: NaiveDate,
    /// Distinct opponents faced at this position.
    pub opponents: Vec<String>,
    pub home_games: usize,
    pub away_games: usize,
}

/// One opponent the matched player(s) started against.
#[derive(Debug, Clone, Serialize)]
pub struct OpponentRow {
    pub opponent: String,
    pub count: usize,
    pub percentage: String,
    /// Distinct positions played against this opponent.
    pub positions: Vec<String>,
}

/// Profile of one player (or fuzzy-matched player set) within a team.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    /// Distinct player names the query matched.
    pub matched_players: Vec<String>,
    pub positions: Vec<PositionRow>,
    pub opponents: Vec<OpponentRow>,
    /// Opponents faced in games where the player appeared without starting.
    pub non_starter_opponents: Vec<String>,
}

/// Tabulate positions played, opponents faced while starting, and opponents
/// faced from the bench, for every player matching `player_query`.
///
/// Zero matching starts yields empty tables, never a division by zero.
pub fn profile_player(
    repo: &LineupRepository,
    team: &str,
    player_query: &str,
    position_field: PositionField,
) -> PlayerProfile {
    let needle = player_query.to_lowercase();
    let matches = |r: &LineupRecord| r.player.to_lowercase().contains(&needle);

    let started: Vec<&LineupRecord> = repo
        .starters_for_team(team)
        .into_iter()
        .filter(|r| matches(r))
        .collect();

    let matched_players: Vec<String> = started
        .iter()
        .map(|r| r.player.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    info!(team, query = player_query, matched = ?matched_players, "player profile");

    let total_starts = started.len();

    let mut by_position: BTreeMap<&str, Vec<&LineupRecord>> = BTreeMap::new();
    for r in &started {
        by_position.entry(r.position_for(position_field)).or_default().push(r);
    }

    let mut positions: Vec<PositionRow> = by_position
        .into_iter()
        .map(|(position, rows)| PositionRow {
            position: position.to_string(),
            count: rows.len(),
            percentage: format_percent(rows.len(), total_starts),
            most_recent_date: rows.iter().map(|r| r.date).max().expect("nonempty group"),
            opponents: distinct(rows.iter().map(|r| r.opponent.as_str())),
            home_games: rows.iter().filter(|r| r.is_home()).count(),
            away_games: rows.iter().filter(|r| !r.is_home()).count(),
        })
        .collect();
    positions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.position.cmp(&b.position)));

    let mut by_opponent: BTreeMap<&str, Vec<&LineupRecord>> = BTreeMap::new();
    for r in &started {
        by_opponent.entry(r.opponent.as_str()).or_default().push(r);
    }

    let mut opponents: Vec<OpponentRow> = by_opponent
        .into_iter()
        .map(|(opponent, rows)| OpponentRow {
            opponent: opponent.to_string(),
            count: rows.len(),
            percentage: format_percent(rows.len(), total_starts),
            positions: distinct(rows.iter().map(|r| r.position_for(position_field))),
        })
        .collect();
    opponents.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.opponent.cmp(&b.opponent)));

    let non_starter_opponents = distinct(
        repo.non_starters_for_team(team)
            .into_iter()
            .filter(|r| matches(r))
            .map(|r| r.opponent.as_str()),
    );

    PlayerProfile {
        matched_players,
        positions,
        opponents,
        non_starter_opponents,
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
