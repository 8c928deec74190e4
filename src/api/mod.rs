//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod bulk;
pub mod error;
pub mod handlers;
pub mod progress;
pub mod rewards;
pub mod routes;
pub mod tasks;

pub use bulk::{DATA_SAVED_MESSAGE, get_data, save_data};
pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{AppState, HealthResponse, MessageResponse, health_check};
pub use progress::{get_progress, put_progress};
pub use rewards::{list_rewards, update_reward};
pub use routes::build_router;
pub use tasks::{TASK_DELETED_MESSAGE, create_task, delete_task, list_tasks, update_task};
