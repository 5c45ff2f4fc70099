use crate::application::users::register::{RegisterUserRequest, RegisterUserUseCase};
use crate::infrastructure::password::Argon2PasswordHasher;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::session::DbSession;
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::MessageResponse;
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User created successfully", body = MessageResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "User Auth"
)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = DbSession::open(&state.pool).await?;
    let repo = Arc::new(PostgresUserRepository::new(session));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let use_case = RegisterUserUseCase::new(repo, hasher);

    use_case.execute(req).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("User created successfully")),
    ))
}
