//! Reward endpoints.
//!
//! Rewards are opaque objects keyed by `id`. Update reports a missing id with
//! 404, like task update.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Map, Value};

use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{REWARDS_KEY, replace_first};

/// Lists all rewards in stored order.
///
/// # Errors
///
/// Returns a 500 [`ApiErrorResponse`] if the document cannot be read or its
/// `rewards` key is not an array.
pub async fn list_rewards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ApiErrorResponse> {
    let document = state.store.read().await?;
    Ok(Json(document.collection(REWARDS_KEY)?.to_vec()))
}

/// Replaces the first reward whose `id` matches the path with the request body.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] in the following cases:
/// - No reward has the id (404 Not Found, `{"error": "Reward not found"}`); nothing is written
/// - Body is not a JSON object, or storage failure (500 Internal Server Error)
pub async fn update_reward(
    State(state): State<AppState>,
    Path(reward_id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, ApiErrorResponse> {
    let Json(reward) = body?;
    let _guard = state.lock_for_write().await;
    let mut document = state.store.read().await?;

    let rewards = document.collection_mut(REWARDS_KEY)?;
    if !replace_first(rewards, &reward_id, Value::Object(reward.clone())) {
        return Err(ApiErrorResponse::not_found("Reward"));
    }

    state.store.write(&document).await?;

    tracing::debug!(%reward_id, "Reward updated");
    Ok(Json(reward))
}
