use serde::Deserialize;

/// Subset of the Message resource returned when a message is queued.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageErrorResponse {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
}
