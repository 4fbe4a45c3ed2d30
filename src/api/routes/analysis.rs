use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::analyze::{
    find_anticorrelated, find_co_starters, formation_profile, mine_formation_rules,
    profile_player, AntiCorrelationReport, AssociationRule, CoStarterQuery, CoStarterReport,
    FormationRow, PlayerProfile,
};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::repository::LineupRepository;

// ── Co-starter Endpoints ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CoStarterParams {
    pub team: String,
    /// Comma-separated player names that must start.
    pub include: Option<String>,
    /// Comma-separated player names that must not start.
    pub exclude: Option<String>,
    pub set_pieces: Option<bool>,
    pub season: Option<u32>,
    pub league: Option<String>,
}

impl CoStarterParams {
    fn to_query(&self) -> Result<CoStarterQuery, ApiError> {
        let included = split_names(self.include.as_deref());
        let excluded = split_names(self.exclude.as_deref());
        if included.is_empty() && excluded.is_empty() {
            return Err(ApiError::BadRequest(
                "At least one of include/exclude must name a player".to_string(),
            ));
        }
        Ok(CoStarterQuery {
            team: self.team.clone(),
            included,
            excluded,
            set_pieces: self.set_pieces.unwrap_or(false),
        })
    }
}

pub async fn co_starters(
    State(state): State<AppState>,
    Query(params): Query<CoStarterParams>,
) -> Result<Json<CoStarterReport>, ApiError> {
    let query = params.to_query()?;
    let repo = scoped(&state, params.season, params.league.as_deref());
    Ok(Json(find_co_starters(&repo, &query)))
}

pub async fn anticorrelated(
    State(state): State<AppState>,
    Query(params): Query<CoStarterParams>,
) -> Result<Json<AntiCorrelationReport>, ApiError> {
    let query = params.to_query()?;
    let repo = scoped(&state, params.season, params.league.as_deref());
    Ok(Json(find_anticorrelated(&repo, &query)))
}

// ── Team Profile Endpoints ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TeamParams {
    pub team: String,
    pub season: Option<u32>,
    pub league: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct FormationsResponse {
    pub team: String,
    pub formations: Vec<FormationRow>,
}

pub async fn formations(
    State(state): State<AppState>,
    Query(params): Query<TeamParams>,
) -> Result<Json<FormationsResponse>, ApiError> {
    let repo = scoped(&state, params.season, params.league.as_deref());
    let formations = formation_profile(
        &repo,
        &params.team,
        state.analysis.formation_position_field,
    );
    Ok(Json(FormationsResponse {
        team: params.team,
        formations,
    }))
}

#[derive(Debug, serde::Serialize)]
pub struct RulesResponse {
    pub team: String,
    pub rules: Vec<AssociationRule>,
}

pub async fn rules(
    State(state): State<AppState>,
    Query(params): Query<TeamParams>,
) -> Result<Json<RulesResponse>, ApiError> {
    let repo = scoped(&state, params.season, params.league.as_deref());
    let rules = mine_formation_rules(
        &repo,
        &params.team,
        state.analysis.formation_position_field,
    );
    Ok(Json(RulesResponse {
        team: params.team,
        rules,
    }))
}

// ── Player Profile Endpoint ─────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    pub team: String,
    pub player: String,
    pub season: Option<u32>,
    pub league: Option<String>,
}

pub async fn player(
    State(state): State<AppState>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<PlayerProfile>, ApiError> {
    if params.player.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Player query must not be empty".to_string(),
        ));
    }
    let repo = scoped(&state, params.season, params.league.as_deref());
    Ok(Json(profile_player(
        &repo,
        &params.team,
        params.player.trim(),
        state.analysis.profile_position_field,
    )))
}

// ── Helpers ─────────────────────────────────────────────────────

/// Per-request snapshot narrowed to the requested season/league. The shared
/// table is never mutated; narrowing copies.
fn scoped(state: &AppState, season: Option<u32>, league: Option<&str>) -> LineupRepository {
    let mut repo: LineupRepository = (*state.repository).clone();
    if let Some(season) = season {
        repo = repo.filter_season(season);
    }
    if let Some(league) = league {
        repo = repo.filter_league(league);
    }
    repo
}

fn split_names(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
