use crate::application::users::register::RegisterUserRequest;
use crate::shared::error::{ApiError, ErrorResponse};
use crate::shared::response::MessageResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kiddo Motivate Backend Routes",
        version = "0.1.0",
        description = "User account API"
    ),
    paths(crate::presentation::handlers::users::register_user),
    components(schemas(RegisterUserRequest, MessageResponse, ErrorResponse, ApiError)),
    tags((name = "User Auth", description = "User registration endpoints"))
)]
pub struct ApiDoc;
