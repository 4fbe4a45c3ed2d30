use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::season_label;

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub teams: Vec<String>,
}

pub async fn teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, ApiError> {
    Ok(Json(TeamsResponse {
        teams: state.repository.teams(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SeasonEntry {
    pub code: u32,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<SeasonEntry>,
}

pub async fn seasons(State(state): State<AppState>) -> Result<Json<SeasonsResponse>, ApiError> {
    let seasons = state
        .repository
        .seasons()
        .into_iter()
        .map(|code| SeasonEntry {
            code,
            label: season_label(code),
        })
        .collect();
    Ok(Json(SeasonsResponse { seasons }))
}

#[derive(Debug, Deserialize)]
pub struct PlayersParams {
    pub team: String,
    /// "minutes" orders by total minutes played; anything else alphabetical.
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub team: String,
    pub players: Vec<String>,
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<PlayersParams>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let players = if params.sort.as_deref() == Some("minutes") {
        state.repository.players_by_minutes(&params.team)
    } else {
        state.repository.players_for_team(&params.team)
    };

    if players.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No players found for team: {}",
            params.team
        )));
    }

    Ok(Json(PlayersResponse {
        team: params.team,
        players,
    }))
}
