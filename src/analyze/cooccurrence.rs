//! Co-starter and anticorrelated player rankings.
//!
//! A game is valid for a query when its starting XI contains every included
//! player and none of the excluded players. Rankings count starts across
//! valid games for everyone else on the sheet.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::analyze::{format_percent, TOP_N};
use crate::models::LineupRecord;
use crate::repository::{starters_by_game, LineupRepository};

/// Parameters for a co-occurrence query.
#[derive(Debug, Clone, Default)]
pub struct CoStarterQuery {
    pub team: String,
    /// Players that must all be in the starting XI.
    pub included: Vec<String>,
    /// Players that must not be in the starting XI.
    pub excluded: Vec<String>,
    /// Also report each player's mean share of team set pieces.
    pub set_pieces: bool,
}

/// Mean share of team set pieces across valid games, integer percents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetPieceShare {
    pub freekicks_pct: u32,
    pub cornerkicks_pct: u32,
}

/// One ranked co-starter row.
#[derive(Debug, Clone, Serialize)]
pub struct CoStarterRow {
    pub player: String,
    pub starts_together: usize,
    /// starts_together / valid_games as an integer percentage, e.g. "67%".
    pub combo_freq: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_pieces: Option<SetPieceShare>,
}

/// Result of a co-starter query.
#[derive(Debug, Clone, Serialize)]
pub struct CoStarterReport {
    pub rows: Vec<CoStarterRow>,
    pub valid_games: usize,
    pub summary: String,
}

/// One anticorrelated-player row.
#[derive(Debug, Clone, Serialize)]
pub struct AntiCorrelationRow {
    pub player: String,
    pub starts_apart: usize,
}

/// Result of an anticorrelation query.
#[derive(Debug, Clone, Serialize)]
pub struct AntiCorrelationReport {
    pub rows: Vec<AntiCorrelationRow>,
    pub valid_games: usize,
    pub summary: String,
}

/// Rank players by how often they start alongside the included set (and
/// without the excluded set).
///
/// Both sets empty is an underspecified query and returns an empty report;
/// an empty included set alone is a pure exclusion query. No valid games is
/// a normal outcome, not an error.
pub fn find_co_starters(repo: &LineupRepository, query: &CoStarterQuery) -> CoStarterReport {
    info!(
        team = %query.team,
        included = ?query.included,
        excluded = ?query.excluded,
        "co-starter query"
    );

    if query.included.is_empty() && query.excluded.is_empty() {
        return CoStarterReport {
            rows: Vec::new(),
            valid_games: 0,
            summary: format!("No players selected for {}.", query.team),
        };
    }

    let (valid_rows, valid_games) = valid_game_rows(repo, query);
    debug!(valid_games, "qualifying games");

    let queried: HashSet<&str> = query
        .included
        .iter()
        .chain(query.excluded.iter())
        .map(String::as_str)
        .collect();

    let mut starts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &valid_rows {
        if !queried.contains(r.player.as_str()) {
            *starts.entry(r.player.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = starts.into_iter().collect();
    // Descending by count; the BTreeMap already yields alphabetical ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_N);

    let shares = if query.set_pieces {
        Some(set_piece_shares(&valid_rows))
    } else {
        None
    };

    let rows = ranked
        .into_iter()
        .map(|(player, count)| CoStarterRow {
            player: player.to_string(),
            starts_together: count,
            combo_freq: format_percent(count, valid_games),
            set_pieces: shares.as_ref().map(|s| {
                s.get(player).copied().unwrap_or(SetPieceShare {
                    freekicks_pct: 0,
                    cornerkicks_pct: 0,
                })
            }),
        })
        .collect();

    CoStarterReport {
        rows,
        valid_games,
        summary: co_starter_summary(query, valid_games),
    }
}

/// Rank players by how rarely they start alongside the included set.
///
/// Same validity filter as [`find_co_starters`]; counts below 2 are dropped
/// so one-off appearances do not read as anticorrelation.
pub fn find_anticorrelated(
    repo: &LineupRepository,
    query: &CoStarterQuery,
) -> AntiCorrelationReport {
    if query.included.is_empty() && query.excluded.is_empty() {
        return AntiCorrelationReport {
            rows: Vec::new(),
            valid_games: 0,
            summary: format!("No players selected for {}.", query.team),
        };
    }

    let (valid_rows, valid_games) = valid_game_rows(repo, query);

    let queried: HashSet<&str> = query
        .included
        .iter()
        .chain(query.excluded.iter())
        .map(String::as_str)
        .collect();

    let mut starts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &valid_rows {
        if !queried.contains(r.player.as_str()) {
            *starts.entry(r.player.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = starts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .collect();
    // Ascending: rarest co-starters first.
    ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_N);

    let rows = ranked
        .into_iter()
        .map(|(player, count)| AntiCorrelationRow {
            player: player.to_string(),
            starts_apart: count,
        })
        .collect();

    AntiCorrelationReport {
        rows,
        valid_games,
        summary: co_starter_summary(query, valid_games),
    }
}

/// Starter rows belonging to valid games, plus the distinct valid game count.
fn valid_game_rows<'a>(
    repo: &'a LineupRepository,
    query: &CoStarterQuery,
) -> (Vec<&'a LineupRecord>, usize) {
    let starters = repo.starters_for_team(&query.team);
    let games = starters_by_game(&starters);

    let included: HashSet<&str> = query.included.iter().map(String::as_str).collect();
    let excluded: HashSet<&str> = query.excluded.iter().map(String::as_str).collect();

    let mut rows: Vec<&LineupRecord> = Vec::new();
    let mut count = 0usize;
    for game_rows in games.values() {
        let players: HashSet<&str> = game_rows.iter().map(|r| r.player.as_str()).collect();
        if included.is_subset(&players) && excluded.is_disjoint(&players) {
            count += 1;
            rows.extend(game_rows.iter().copied());
        }
    }
    (rows, count)
}

/// Mean per-player share of each set-piece category across the games the
/// player started. A game where the team took no set pieces in a category
/// contributes a 0% share.
fn set_piece_shares(valid_rows: &[&LineupRecord]) -> BTreeMap<String, SetPieceShare> {
    // Team totals per game, both categories combined (total set pieces).
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for r in valid_rows {
        *totals.entry(r.game_id.as_str()).or_default() += r.freekicks + r.cornerkicks;
    }

    // Per-player running sums of per-game percentage shares.
    let mut acc: BTreeMap<String, (f64, f64, usize)> = BTreeMap::new();
    for r in valid_rows {
        let total = totals.get(r.game_id.as_str()).copied().unwrap_or(0);
        let (fk, ck) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                f64::from(r.freekicks) / f64::from(total) * 100.0,
                f64::from(r.cornerkicks) / f64::from(total) * 100.0,
            )
        };
        let entry = acc.entry(r.player.clone()).or_insert((0.0, 0.0, 0));
        entry.0 += fk;
        entry.1 += ck;
        entry.2 += 1;
    }

    acc.into_iter()
        .map(|(player, (fk, ck, games))| {
            let games = games.max(1) as f64;
            (
                player,
                SetPieceShare {
                    freekicks_pct: (fk / games).round() as u32,
                    cornerkicks_pct: (ck / games).round() as u32,
                },
            )
        })
        .collect()
}

fn co_starter_summary(query: &CoStarterQuery, valid_games: usize) -> String {
    let included = query.included.join(", ");
    let excluded = query.excluded.join(", ");

    let headline = match (query.included.len(), query.excluded.len()) {
        (0, 0) => format!("No players selected for {}.", query.team),
        (0, _) => format!(
            "Found {} games where {} did not start for {}.",
            valid_games, excluded, query.team
        ),
        (1, 0) => format!(
            "Found {} games where {} started for {}.",
            valid_games, included, query.team
        ),
        (_, 0) => format!(
            "Found {} games where {} started together for {}.",
            valid_games, included, query.team
        ),
        (1, _) => format!(
            "Found {} games where {} started and {} did not start for {}.",
            valid_games, included, excluded, query.team
        ),
        (_, _) => format!(
            "Found {} games where {} started together and {} did not start for {}.",
            valid_games, included, excluded, query.team
        ),
    };

    let included_line = if query.included.is_empty() {
        "Included player(s): None".to_string()
    } else {
        format!("Included player(s): ({}) {}", query.included.len(), included)
    };
    let excluded_line = if query.excluded.is_empty() {
        "Excluded player(s): None".to_string()
    } else {
        format!("Excluded player(s): ({}) {}", query.excluded.len(), excluded)
    };

    format!("{}\n{}\n{}", headline, included_line, excluded_line)
}
