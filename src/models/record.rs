//! Lineup record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which column encodes a player's position for an analysis.
///
/// The source data carries three position columns that different analyses
/// read; callers pick one explicitly instead of relying on whichever column
/// happens to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PositionField {
    /// Registered position for the specific game.
    Position,
    /// The player's historically most common position.
    #[default]
    MostCommon,
    /// The normalized per-game position assignment.
    New,
}

impl std::str::FromStr for PositionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "position" => Ok(PositionField::Position),
            "most_common" | "most_common_position" => Ok(PositionField::MostCommon),
            "new" | "new_position" => Ok(PositionField::New),
            other => Err(format!("unknown position field: {}", other)),
        }
    }
}

/// One (game, player) appearance in a team sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupRecord {
    /// Composite fixture key: `{season}:{game}`. Unique per fixture.
    pub game_id: String,

    /// Team the player appeared for.
    pub team: String,

    /// Opposing team.
    pub opponent: String,

    /// Home side of the fixture.
    pub home_team: String,

    /// Away side of the fixture.
    pub away_team: String,

    /// Player name. Not unique across teams; several queries match it
    /// case-insensitively and by substring.
    pub player: String,

    /// Registered position for this game.
    pub position: String,

    /// The player's historically most common position.
    pub most_common_position: String,

    /// Normalized per-game position assignment.
    pub new_position: String,

    /// Whether the player was in the starting XI.
    pub is_starter: bool,

    /// Whether the registered position differs from the most common one.
    pub is_oop: bool,

    /// Season code, e.g. 2324.
    pub season: u32,

    /// League identifier, e.g. "ENG-Premier League".
    pub league: String,

    /// Fixture date.
    pub date: NaiveDate,

    /// Minutes played in this game.
    pub minutes_played: u32,

    /// Free kicks taken by this player in this game.
    #[serde(default)]
    pub freekicks: u32,

    /// Corner kicks taken by this player in this game.
    #[serde(default)]
    pub cornerkicks: u32,
}

impl LineupRecord {
    /// The position code under the given field selection.
    pub fn position_for(&self, field: PositionField) -> &str {
        match field {
            PositionField::Position => &self.position,
            PositionField::MostCommon => &self.most_common_position,
            PositionField::New => &self.new_position,
        }
    }

    /// Whether this appearance was a home game for the player's team.
    pub fn is_home(&self) -> bool {
        self.home_team == self.team
    }

    /// Display label for the season code, e.g. 2324 -> "2023-2024".
    pub fn season_label(&self) -> String {
        season_label(self.season)
    }

    /// Display label for the league, e.g. "ENG-Premier League" -> "Premier League".
    pub fn league_label(&self) -> String {
        league_label(&self.league)
    }
}

/// Expand a two-digit-pair season code into "20xx-20yy".
pub fn season_label(season: u32) -> String {
    let start = season / 100;
    let end = season % 100;
    format!("20{:02}-20{:02}", start, end)
}

/// Strip the country/confederation prefix from a league identifier.
pub fn league_label(league: &str) -> String {
    match league.split_once('-') {
        Some((_, name)) => name.to_string(),
        None => league.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_id: &str, player: &str) -> LineupRecord {
        LineupRecord {
            game_id: game_id.to_string(),
            team: "Alpha".to_string(),
            opponent: "Beta".to_string(),
            home_team: "Alpha".to_string(),
            away_team: "Beta".to_string(),
            player: player.to_string(),
            position: "CM".to_string(),
            most_common_position: "CM".to_string(),
            new_position: "CM".to_string(),
            is_starter: true,
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
    fn test_position_for_field_selection() {
        let mut r = record("2324:g1", "A");
        r.position = "LB".to_string();
        r.most_common_position = "CB".to_string();
        r.new_position = "LWB".to_string();

        assert_eq!(r.position_for(PositionField::Position), "LB");
        assert_eq!(r.position_for(PositionField::MostCommon), "CB");
        assert_eq!(r.position_for(PositionField::New), "LWB");
    }

    #[test]
    fn test_is_home() {
        let mut r = record("2324:g1", "A");
        assert!(r.is_home());
        r.home_team = "Beta".to_string();
        r.away_team = "Alpha".to_string();
        assert!(!r.is_home());
    }

    #[test]
    fn test_season_label() {
        assert_eq!(season_label(2324), "2023-2024");
        assert_eq!(season_label(1617), "2016-2017");
        assert_eq!(season_label(910), "2009-2010");
    }

    #[test]
    fn test_league_label() {
        assert_eq!(league_label("ENG-Premier League"), "Premier League");
        assert_eq!(league_label("UEFA-Champions League"), "Champions League");
        assert_eq!(league_label("Bundesliga"), "Bundesliga");
    }

    #[test]
    fn test_position_field_parse() {
        use std::str::FromStr;
        assert_eq!(
            PositionField::from_str("most_common").unwrap(),
            PositionField::MostCommon
        );
        assert_eq!(
            PositionField::from_str("new_position").unwrap(),
            PositionField::New
        );
        assert!(PositionField::from_str("bogus").is_err());
    }

    #[test]
    fn test_record_serialization() {
        let r = record("2324:g1", "A");
        let json = serde_json::to_string(&r).unwrap();
        let back: LineupRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r.game_id, back.game_id);
        assert_eq!(r.player, back.player);
        assert_eq!(r.date, back.date);
    }
}
