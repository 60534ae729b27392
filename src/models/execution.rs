use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to execute a code snippet
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RunCodeRequest {
    pub code: String,
}

/// Response for the bare /run endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RunCodeResponse {
    pub output: String,
    pub error: Option<String>,
}

/// Response for a per-room execution
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub output: String,
    pub execution_id: i32,
}

/// One stored execution record
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: i32,
    pub code: String,
    pub output: String,
    pub executed_at: DateTime<Utc>,
}
