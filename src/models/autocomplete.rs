use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request for an autocomplete suggestion
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub cursor_position: usize,
}

/// Response carrying the suggestion (may be empty)
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AutocompleteResponse {
    pub suggestion: String,
}
