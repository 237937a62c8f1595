use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use teamboard_core::TeamboardError;
use teamboard_domain::{CardId, CardPatch, Column};
use tower_http::cors::CorsLayer;

use crate::coordinator::Coordinator;

pub type SharedCoordinator = Arc<Coordinator>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCardsQuery {
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub title: String,
    pub column: String,
    pub team_name: String,
}

#[derive(Deserialize)]
pub struct UpdateCardRequest {
    pub title: Option<String>,
    pub column: Option<String>,
}

// ── Error handling ────────────────────────────────────────────────────

/// Maps the error taxonomy onto HTTP statuses; bodies are always
/// `{"error": message}`.
pub struct ApiError(TeamboardError);

impl From<TeamboardError> for ApiError {
    fn from(err: TeamboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TeamboardError::Validation(_) => StatusCode::BAD_REQUEST,
            TeamboardError::NotFound(_) | TeamboardError::TeamNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

/// The board is served to browsers from another origin, hence the
/// permissive CORS layer.
pub fn router(coordinator: SharedCoordinator) -> Router {
    Router::new()
        .route("/cards", get(list_cards).post(create_card))
        .route("/cards/{id}", patch(update_card).delete(delete_card))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(coordinator)
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_cards(
    State(coordinator): State<SharedCoordinator>,
    Query(query): Query<ListCardsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let team_name = query
        .team_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| TeamboardError::Validation("Team name is required".to_string()))?;
    let cards = coordinator.list_cards(team_name).await?;
    Ok(Json(cards))
}

async fn create_card(
    State(coordinator): State<SharedCoordinator>,
    Json(req): Json<CreateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let column = parse_column(&req.column)?;
    let card = coordinator
        .create_card(&req.team_name, &req.title, column)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn update_card(
    State(coordinator): State<SharedCoordinator>,
    Path(id): Path<CardId>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let column = req.column.as_deref().map(parse_column).transpose()?;
    let patch = CardPatch {
        title: req.title,
        column,
    };
    let card = coordinator.update_card(id, patch).await?;
    Ok(Json(card))
}

async fn delete_card(
    State(coordinator): State<SharedCoordinator>,
    Path(id): Path<CardId>,
) -> Result<impl IntoResponse, ApiError> {
    coordinator.delete_card(id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Card deleted successfully" }),
    ))
}

fn parse_column(raw: &str) -> Result<Column, TeamboardError> {
    Column::from_str(raw).map_err(TeamboardError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        let resp = ApiError(TeamboardError::Validation("bad".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError(TeamboardError::NotFound("card".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError(TeamboardError::TeamNotFound("Acme".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError(TeamboardError::Internal("boom".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_column_rejects_unknown_strings() {
        assert_eq!(parse_column("doing").unwrap(), Column::Doing);
        assert!(matches!(
            parse_column("archived"),
            Err(TeamboardError::Validation(_))
        ));
    }
}
