use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorBody;
use super::{chat, health};

#[derive(OpenApi)]
#[openapi(
    paths(chat::chat, health::health_check),
    components(schemas(
        chat::ChatRequest,
        chat::ChatResponse,
        health::HealthResponse,
        health::HealthStatus,
        health::ServiceStatus,
        ErrorBody
    )),
    tags(
        (name = "chat", description = "Customer support conversation"),
        (name = "health", description = "Service status")
    ),
    info(title = "Captain Tractors support bot API")
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
