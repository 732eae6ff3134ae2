use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::{
    db::RecommendationFilter,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationType},
};

use super::{
    extract::{JsonBody, RecId},
    AppState,
};

/// Query parameters accepted by the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub source_pid: Option<String>,
    pub recommendation_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListParams {
    /// Picks the single filter to apply.
    ///
    /// Precedence is `name`, `source_pid`, `recommendation_name`, `type`; later
    /// parameters are ignored once one matches. Empty values count as absent.
    pub fn into_filter(self) -> AppResult<Option<RecommendationFilter>> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        if let Some(name) = present(self.name) {
            return Ok(Some(RecommendationFilter::Name(name)));
        }

        if let Some(pid) = present(self.source_pid) {
            let pid = pid.trim().parse().map_err(|_| {
                AppError::InvalidInput(format!("source_pid must be an integer, got '{pid}'"))
            })?;
            return Ok(Some(RecommendationFilter::SourcePid(pid)));
        }

        if let Some(name) = present(self.recommendation_name) {
            return Ok(Some(RecommendationFilter::RecommendationName(name)));
        }

        if let Some(kind) = present(self.kind) {
            let kind: RecommendationType = kind.to_uppercase().parse()?;
            return Ok(Some(RecommendationFilter::Type(kind)));
        }

        Ok(None)
    }
}

async fn find_or_404(state: &AppState, rec_id: i64) -> AppResult<Recommendation> {
    state
        .repository
        .find(rec_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recommendation with id '{rec_id}' was not found.")))
}

/// List recommendations, optionally filtered by one field
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let recommendations = match params.into_filter()? {
        Some(filter) => {
            tracing::info!(?filter, "Request to list filtered recommendations");
            state.repository.find_by(&filter).await?
        }
        None => {
            tracing::info!("Request to list all recommendations");
            state.repository.all().await?
        }
    };

    Ok(Json(recommendations))
}

/// Retrieve a single recommendation
pub async fn get(State(state): State<AppState>, RecId(rec_id): RecId) -> AppResult<Json<Recommendation>> {
    tracing::info!(rec_id, "Request for recommendation");

    let recommendation = find_or_404(&state, rec_id).await?;
    Ok(Json(recommendation))
}

/// Create a recommendation; any client-supplied `rec_id` is ignored
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Recommendation>)> {
    let recommendation = Recommendation::from_value(&body)?;
    tracing::info!(name = %recommendation.recommendation_name, "Request to create recommendation");

    let created = state.repository.create(recommendation).await?;
    let rec_id = created
        .rec_id
        .ok_or_else(|| AppError::Internal("storage returned a recommendation without rec_id".to_string()))?;

    tracing::info!(rec_id, "Recommendation created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/recommendations/{rec_id}"))],
        Json(created),
    ))
}

/// Replace every field except the identity
///
/// The identity is resolved before the body is looked at, so a missing id is
/// 404 whatever the request carries.
pub async fn update(
    State(state): State<AppState>,
    RecId(rec_id): RecId,
    body: Result<JsonBody, AppError>,
) -> AppResult<Json<Recommendation>> {
    tracing::info!(rec_id, "Request to update recommendation");

    let mut recommendation = find_or_404(&state, rec_id).await?;
    let JsonBody(body) = body?;
    recommendation.apply(&body)?;

    let updated = state.repository.update(&recommendation).await?;
    Ok(Json(updated))
}

/// Delete a recommendation; 404 when there is nothing to remove
pub async fn delete(State(state): State<AppState>, RecId(rec_id): RecId) -> AppResult<StatusCode> {
    tracing::info!(rec_id, "Request to delete recommendation");

    let recommendation = find_or_404(&state, rec_id).await?;
    state.repository.delete(&recommendation).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Increment the like counter by one
pub async fn like(State(state): State<AppState>, RecId(rec_id): RecId) -> AppResult<Json<Recommendation>> {
    let mut recommendation = find_or_404(&state, rec_id).await?;
    recommendation.like();

    let updated = state.repository.update(&recommendation).await?;
    tracing::info!(rec_id, likes = updated.number_of_likes, "Recommendation liked");
    Ok(Json(updated))
}

/// Increment the dislike counter by one
pub async fn dislike(State(state): State<AppState>, RecId(rec_id): RecId) -> AppResult<Json<Recommendation>> {
    let mut recommendation = find_or_404(&state, rec_id).await?;
    recommendation.dislike();

    let updated = state.repository.update(&recommendation).await?;
    tracing::info!(rec_id, dislikes = updated.number_of_dislikes, "Recommendation disliked");
    Ok(Json(updated))
}
