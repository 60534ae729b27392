use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for the health check
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Response for the service root
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub websocket: String,
}
