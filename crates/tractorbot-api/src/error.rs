use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    
    #[error("Invalid or missing API key")]
    Unauthorized,
    
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },
    
    #[error("{0}")]
    ServiceUnavailable(String),
    
    #[error("Request timed out")]
    Timeout,
    
    #[error("Persistence error: {0}")]
    Persist(#[from] tractorbot_persist::PersistError),
    
    #[error("Vector database error: {0}")]
    Vector(#[from] tractorbot_vector::VectorError),
    
    #[error("Processing error: {0}")]
    Processing(#[from] anyhow::Error),
    
    #[error("Internal server error")]
    Internal,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::RateLimited { retry_after } => {
                let body = Json(json!({
                    "error": self.to_string(),
                    "retry_after": retry_after,
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                return response;
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!("Service unavailable: {}", self);
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Vector(ref e) => {
                tracing::error!("Vector database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Retrieval error".to_string())
            }
            ApiError::Processing(ref e) => {
                tracing::error!("Processing error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Processing error".to_string())
            }
            ApiError::Timeout => {
                tracing::warn!("Request exceeded the server timeout");
                (StatusCode::REQUEST_TIMEOUT, self.to_string())
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
