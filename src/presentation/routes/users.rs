use crate::presentation::handlers::users;
use axum::{Router, routing::post};

use crate::infrastructure::state::AppState;

/// User account routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(users::register_user))
}
