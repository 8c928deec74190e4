//! Router construction.
//!
//! The schema revision decides which historical route table is mounted
//! under `/api`. Routes outside the table fall through to axum's 404/405.

use axum::Router;
use axum::routing::{MethodRouter, delete, get, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::bulk::{get_data, save_data};
use super::handlers::{AppState, health_check};
use super::progress::{get_progress, put_progress};
use super::rewards::{list_rewards, update_reward};
use super::tasks::{create_task, delete_task, list_tasks, update_task};

/// Builds the `/api` routes for the revision held in `state`.
fn api_routes(state: &AppState) -> Router<AppState> {
    let revision = state.revision;

    let task_item: MethodRouter<AppState> = if revision.supports_task_update() {
        delete(delete_task).put(update_task)
    } else {
        delete(delete_task)
    };

    let mut routes = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", task_item);

    if revision.has_progress() {
        routes = routes.route("/progress", get(get_progress).put(put_progress));
    }

    if revision.has_rewards() {
        routes = routes
            .route("/rewards", get(list_rewards))
            .route("/rewards/{id}", put(update_reward));
    }

    if revision.has_bulk_data() {
        routes = routes.route("/data", get(get_data).post(save_data));
    }

    routes
}

/// Builds the application router with CORS and request tracing.
///
/// CORS admits any origin, method and header.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
