use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthStatus {
    pub fn from_services(services: &ServiceStatus) -> Self {
        match (services.ai_service, services.vector_db) {
            (true, true) => Self::Healthy,
            (true, false) => Self::Degraded,
            (false, _) => Self::Critical,
        }
    }
    
    pub fn message(&self) -> &'static str {
        match self {
            Self::Healthy => "All required services operational",
            Self::Degraded => "Core services operational, some features limited",
            Self::Critical => "Critical services unavailable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceStatus {
    pub ai_service: bool,
    pub vector_db: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: String,
    pub version: String,
    pub services: ServiceStatus,
}

/// Health check endpoint
///
/// Returns the health status of the API and its dependencies
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status, including degraded states", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<HealthResponse> {
    let vector_db = match state.chat.vector_db() {
        Some(db) => db.health_check().await,
        None => false,
    };
    let services = ServiceStatus {
        ai_service: state.chat.ai_available(),
        vector_db,
    };
    let status = HealthStatus::from_services(&services);
    
    Json(HealthResponse {
        status,
        message: status.message().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_services() {
        let s = |ai, vector| ServiceStatus { ai_service: ai, vector_db: vector };
        assert_eq!(HealthStatus::from_services(&s(true, true)), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_services(&s(true, false)), HealthStatus::Degraded);
        assert_eq!(HealthStatus::from_services(&s(false, true)), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_services(&s(false, false)), HealthStatus::Critical);
        assert_eq!(HealthStatus::Degraded.message(), "Core services operational, some features limited");
    }
}
