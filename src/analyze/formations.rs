//! Positional formation profiles.
//!
//! Each game's ten outfield starting positions, sorted canonically, form a
//! formation signature. The profile counts how often a team fields each
//! signature and how many starters were out of position on average.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{sort_positions, PositionField};
use crate::repository::{starters_by_game, LineupRepository};

/// Outfield starters expected per complete lineup (goalkeeper excluded
/// upstream).
pub const SIGNATURE_LEN: usize = 10;

/// One formation signature row.
#[derive(Debug, Clone, Serialize)]
pub struct FormationRow {
    /// Canonically sorted ten-position multiset.
    pub signature: Vec<String>,
    /// Games fielding this signature.
    pub count: usize,
    /// Mean out-of-position starters across those games. Rounded only for
    /// display.
    pub mean_oop: f64,
}

/// Frequency profile of a team's formation signatures.
///
/// Incomplete lineups (not exactly ten positions after dedup) are dropped,
/// as are signatures seen only once. Rows come back ordered by count
/// descending, ties by signature ordering.
pub fn formation_profile(
    repo: &LineupRepository,
    team: &str,
    position_field: PositionField,
) -> Vec<FormationRow> {
    let starters = repo.starters_for_team(team);
    let games = starters_by_game(&starters);

    let mut by_signature: BTreeMap<Vec<String>, (usize, u32)> = BTreeMap::new();
    for (game_id, rows) in &games {
        if rows.len() != SIGNATURE_LEN {
            debug!(game_id, positions = rows.len(), "skipping incomplete lineup");
            continue;
        }
        let mut positions: Vec<String> = rows
            .iter()
            .map(|r| r.position_for(position_field).to_string())
            .collect();
        sort_positions(&mut positions);

        let oop = rows.iter().filter(|r| r.is_oop).count() as u32;
        let entry = by_signature.entry(positions).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += oop;
    }

    let mut rows: Vec<FormationRow> = by_signature
        .into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(signature, (count, oop_sum))| FormationRow {
            signature,
            count,
            mean_oop: f64::from(oop_sum) / count as f64,
        })
        .collect();

    // BTreeMap iteration already orders equal counts by signature.
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.signature.cmp(&b.signature)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineupRecord;
    use chrono::NaiveDate;

    fn starter(game_id: &str, player: &str, position: &str, oop: bool) -> LineupRecord {
        LineupRecord {
            game_id: game_id.to_string(),
            team: "Alpha".to_string(),
            opponent: "Beta".to_string(),
            home_team: "Alpha".to_string(),
            away_team: "Beta".to_string(),
            player: player.to_string(),
            position: position.to_string(),
            most_common_position: position.to_string(),
            new_position: position.to_string(),
            is_starter: true,
            is_oop: oop,
            season: 2324,
            league: "ENG-Premier League".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            minutes_played: 90,
            freekicks: 0,
            cornerkicks: 0,
        }
    }

    const FOUR_FOUR_TWO: [&str; 10] = [
        "CB", "CB", "LB", "RB", "CM", "CM", "LM", "RM", "CF", "CF",
    ];

    fn game(game_id: &str, positions: &[&str], oop_count: usize) -> Vec<LineupRecord> {
        positions
            .iter()
            .enumerate()
            .map(|(i, pos)| starter(game_id, &format!("P{}", i), pos, i < oop_count))
            .collect()
    }

    #[test]
    fn test_repeated_signature_counted() {
        let mut records = Vec::new();
        for i in 0..12 {
            records.extend(game(&format!("2324:g{}", i), &FOUR_FOUR_TWO, 0));
        }
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 12);
        assert_eq!(rows[0].signature.len(), SIGNATURE_LEN);
    }

    #[test]
    fn test_signature_order_independent() {
        let mut shuffled: Vec<&str> = FOUR_FOUR_TWO.to_vec();
        shuffled.reverse();

        let mut records = game("2324:g1", &FOUR_FOUR_TWO, 0);
        records.extend(game("2324:g2", &shuffled, 0));
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_incomplete_lineups_dropped() {
        let mut records = Vec::new();
        records.extend(game("2324:g1", &FOUR_FOUR_TWO[..9], 0)); // nine positions
        records.extend(game("2324:g2", &FOUR_FOUR_TWO, 0));
        records.extend(game("2324:g3", &FOUR_FOUR_TWO, 0));
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_singleton_signatures_dropped() {
        let other: [&str; 10] = [
            "CB", "CB", "CB", "LWB", "RWB", "CM", "CM", "AMC", "CF", "CF",
        ];
        let mut records = Vec::new();
        records.extend(game("2324:g1", &FOUR_FOUR_TWO, 0));
        records.extend(game("2324:g2", &FOUR_FOUR_TWO, 0));
        records.extend(game("2324:g3", &other, 0));
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_mean_oop() {
        let mut records = Vec::new();
        records.extend(game("2324:g1", &FOUR_FOUR_TWO, 2));
        records.extend(game("2324:g2", &FOUR_FOUR_TWO, 3));
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert!((rows[0].mean_oop - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let other: [&str; 10] = [
            "CB", "CB", "CB", "LWB", "RWB", "CM", "CM", "AMC", "CF", "CF",
        ];
        let mut records = Vec::new();
        for i in 0..2 {
            records.extend(game(&format!("2324:a{}", i), &FOUR_FOUR_TWO, 0));
        }
        for i in 0..3 {
            records.extend(game(&format!("2324:b{}", i), &other, 0));
        }
        let repo = LineupRepository::new(records);

        let rows = formation_profile(&repo, "Alpha", PositionField::MostCommon);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[1].count, 2);
    }
}
