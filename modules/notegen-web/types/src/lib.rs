//! Shared types for the notegen web service and its RPC clients.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

// =====================================================
// RPC Request Types
// =====================================================

/// Settings a request may override. Blank strings count as "not set", as do
/// delays that are not whole non-negative seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub notes_dir: Option<String>,
    #[serde(default, deserialize_with = "lenient_secs")]
    pub delay_meta_content: Option<u64>,
    #[serde(default, deserialize_with = "lenient_secs")]
    pub delay_between_rows: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecondsInput {
    Whole(u64),
    Text(String),
    Other(IgnoredAny),
}

/// Accept `5` or `"5"`; anything else (negative, fractional, null) is unset
fn lenient_secs<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SecondsInput::deserialize(deserializer)? {
        SecondsInput::Whole(secs) => Some(secs),
        SecondsInput::Text(text) => text.trim().parse().ok(),
        SecondsInput::Other(_) => None,
    })
}

/// Generate a single note
#[derive(Debug, Serialize, Deserialize)]
pub struct RunOneRequest {
    pub subject: String,
    #[serde(flatten)]
    pub overrides: ConfigOverrides,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// =====================================================
// Domain Types
// =====================================================

/// Result of a single-subject run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOneResult {
    /// Written note, or None when the subject was blank
    pub path: Option<String>,
}

/// A batch subject that failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    pub subject: String,
    pub error: String,
}

/// Result of a batch upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    pub paths: Vec<String>,
    #[serde(default)]
    pub failures: Vec<FailureInfo>,
    #[serde(default)]
    pub aborted: bool,
}

/// Effective settings as shown in the web form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigView {
    pub api_url: String,
    pub notes_dir: String,
    pub delay_meta_content: u64,
    pub delay_between_rows: u64,
    pub request_timeout: u64,
    pub continue_on_error: bool,
}

/// Service health status
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub notes_created: u64,
    pub failures: u64,
}
