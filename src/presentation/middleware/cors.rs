use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, CorsLayer};

/// Credentialed CORS for the configured front-end origins.
///
/// Request headers are mirrored back because a `*` wildcard is not allowed
/// together with credentials.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    if allowed_origins.iter().any(|o| o == "*") {
        anyhow::bail!("Wildcard CORS origin cannot be combined with credentials");
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request()))
}
