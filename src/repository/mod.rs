//! In-memory lineup table with filtered views.
//!
//! A repository is an immutable snapshot of loaded records. Every analyzer
//! takes a view derived from it; nothing here mutates shared state, so
//! concurrent callers need no locking.

use std::collections::{BTreeMap, HashSet};

use crate::models::LineupRecord;

/// Immutable snapshot of lineup records.
#[derive(Debug, Clone, Default)]
pub struct LineupRepository {
    records: Vec<LineupRecord>,
}

impl LineupRepository {
    pub fn new(records: Vec<LineupRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LineupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one team.
    pub fn by_team<'a>(&'a self, team: &str) -> Vec<&'a LineupRecord> {
        self.records.iter().filter(|r| r.team == team).collect()
    }

    /// Starting-XI records for one team, deduplicated on (game_id, player).
    ///
    /// Upstream data occasionally repeats a (game, player) row; the first
    /// occurrence wins so counting stays correct.
    pub fn starters_for_team<'a>(&'a self, team: &str) -> Vec<&'a LineupRecord> {
        dedup_by_game_player(
            self.records
                .iter()
                .filter(|r| r.is_starter && r.team == team),
        )
    }

    /// Non-starting records (bench/unused) for one team, deduplicated.
    pub fn non_starters_for_team<'a>(&'a self, team: &str) -> Vec<&'a LineupRecord> {
        dedup_by_game_player(
            self.records
                .iter()
                .filter(|r| !r.is_starter && r.team == team),
        )
    }

    /// Restrict the snapshot to one season.
    pub fn filter_season(&self, season: u32) -> LineupRepository {
        LineupRepository::new(
            self.records
                .iter()
                .filter(|r| r.season == season)
                .cloned()
                .collect(),
        )
    }

    /// Restrict the snapshot to one league.
    pub fn filter_league(&self, league: &str) -> LineupRepository {
        LineupRepository::new(
            self.records
                .iter()
                .filter(|r| r.league == league)
                .cloned()
                .collect(),
        )
    }

    /// Distinct team names, sorted.
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self
            .records
            .iter()
            .map(|r| r.team.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        teams.sort();
        teams
    }

    /// Distinct season codes, descending (most recent first).
    pub fn seasons(&self) -> Vec<u32> {
        let mut seasons: Vec<u32> = self
            .records
            .iter()
            .map(|r| r.season)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        seasons.sort_unstable_by(|a, b| b.cmp(a));
        seasons
    }

    /// Distinct player names for a team, alphabetical.
    pub fn players_for_team(&self, team: &str) -> Vec<String> {
        let mut players: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.team == team)
            .map(|r| r.player.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        players.sort();
        players
    }

    /// Distinct player names for a team, ordered by total minutes played
    /// (descending), ties alphabetical.
    pub fn players_by_minutes(&self, team: &str) -> Vec<String> {
        let mut minutes: BTreeMap<String, u64> = BTreeMap::new();
        for r in self.records.iter().filter(|r| r.team == team) {
            *minutes.entry(r.player.clone()).or_default() += u64::from(r.minutes_played);
        }
        let mut players: Vec<(String, u64)> = minutes.into_iter().collect();
        players.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        players.into_iter().map(|(p, _)| p).collect()
    }
}

/// Group starter records by game into the set of starting players.
///
/// Input is expected to be deduplicated already; a BTreeMap keeps game
/// iteration order deterministic.
pub fn starters_by_game<'a>(
    starters: &[&'a LineupRecord],
) -> BTreeMap<&'a str, Vec<&'a LineupRecord>> {
    let mut games: BTreeMap<&str, Vec<&LineupRecord>> = BTreeMap::new();
    for r in starters {
        games.entry(r.game_id.as_str()).or_default().push(r);
    }
    games
}

fn dedup_by_game_player<'a>(
    iter: impl Iterator<Item = &'a LineupRecord>,
) -> Vec<&'a LineupRecord> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut out = Vec::new();
    for r in iter {
        if seen.insert((r.game_id.as_str(), r.player.as_str())) {
            out.push(r);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineupRecord;
    use chrono::NaiveDate;

    fn record(game_id: &str, team: &str, player: &str, starter: bool) -> LineupRecord {
        LineupRecord {
            game_id: game_id.to_string(),
            team: team.to_string(),
            opponent: "Beta".to_string(),
            home_team: team.to_string(),
            away_team: "Beta".to_string(),
            player: player.to_string(),
            position: "CM".to_string(),
            most_common_position: "CM".to_string(),
            new_position: "CM".to_string(),
            is_starter: starter,
            is_oop: false,
            season: 2324,
            league: "ENG-Premier League".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            minutes_played: 90,
            freekicks: 0,
            cornerkicks: 0,
        }
    }

    #[test]
    fn test_starters_for_team_filters_and_dedups() {
        let repo = LineupRepository::new(vec![
            record("2324:g1", "Alpha", "A", true),
            record("2324:g1", "Alpha", "A", true), // duplicate row
            record("2324:g1", "Alpha", "B", false),
            record("2324:g1", "Gamma", "C", true),
        ]);

        let starters = repo.starters_for_team("Alpha");
        assert_eq!(starters.len(), 1);
        assert_eq!(starters[0].player, "A");
    }

    #[test]
    fn test_starters_by_game_groups() {
        let repo = LineupRepository::new(vec![
            record("2324:g1", "Alpha", "A", true),
            record("2324:g1", "Alpha", "B", true),
            record("2324:g2", "Alpha", "A", true),
        ]);

        let starters = repo.starters_for_team("Alpha");
        let games = starters_by_game(&starters);
        assert_eq!(games.len(), 2);
        assert_eq!(games["2324:g1"].len(), 2);
        assert_eq!(games["2324:g2"].len(), 1);
    }

    #[test]
    fn test_filter_season_and_league() {
        let mut old = record("2223:g9", "Alpha", "A", true);
        old.season = 2223;
        let mut cup = record("2324:c1", "Alpha", "A", true);
        cup.league = "UEFA-Champions League".to_string();

        let repo = LineupRepository::new(vec![record("2324:g1", "Alpha", "A", true), old, cup]);

        assert_eq!(repo.filter_season(2324).len(), 2);
        assert_eq!(repo.filter_league("ENG-Premier League").len(), 2);
        assert_eq!(
            repo.filter_season(2324)
                .filter_league("ENG-Premier League")
                .len(),
            1
        );
    }

    #[test]
    fn test_teams_and_seasons_sorted() {
        let mut old = record("2223:g9", "Zeta", "A", true);
        old.season = 2223;
        let repo = LineupRepository::new(vec![
            record("2324:g1", "Beta", "A", true),
            record("2324:g1", "Alpha", "B", true),
            old,
        ]);

        assert_eq!(repo.teams(), vec!["Alpha", "Beta", "Zeta"]);
        assert_eq!(repo.seasons(), vec![2324, 2223]);
    }

    #[test]
    fn test_players_by_minutes() {
        let mut a1 = record("2324:g1", "Alpha", "A", true);
        a1.minutes_played = 45;
        let mut b1 = record("2324:g1", "Alpha", "B", true);
        b1.minutes_played = 90;
        let mut a2 = record("2324:g2", "Alpha", "A", true);
        a2.minutes_played = 30;

        let repo = LineupRepository::new(vec![a1, b1, a2]);
        assert_eq!(repo.players_by_minutes("Alpha"), vec!["B", "A"]);
    }

    #[test]
    fn test_non_starters_for_team() {
        let repo = LineupRepository::new(vec![
            record("2324:g1", "Alpha", "A", true),
            record("2324:g1", "Alpha", "B", false),
        ]);
        let bench = repo.non_starters_for_team("Alpha");
        assert_eq!(bench.len(), 1);
        assert_eq!(bench[0].player, "B");
    }
}
