//! Typed HTTP client for the text-generation endpoint.
//!
//! One POST per prompt with body `{"prompt": "..."}`; the endpoint answers
//! `{"output": ...}`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::NoteGenConfig;
use crate::error::InferenceError;

/// A single prompt -> text exchange with a text-generation service
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError>;
}

pub struct HttpInferenceClient {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    prompt: &'a str,
}

impl HttpInferenceClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            client,
        })
    }

    pub fn from_config(config: &NoteGenConfig) -> Result<Self, InferenceError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        log::debug!(
            "POST {} ({} prompt chars)",
            self.endpoint,
            prompt.chars().count()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&InferRequest { prompt })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(extract_output(&body))
    }
}

/// Pull the text out of an endpoint response body.
///
/// - JSON object with a string `output` -> that string
/// - JSON object with any other `output` value -> the value re-encoded as JSON
/// - JSON object without `output` -> empty string
/// - anything else (not JSON, or JSON but not an object) -> the raw body
pub fn extract_output(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("output") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_output_string() {
        assert_eq!(extract_output(r#"{"output": "hello"}"#), "hello");
        assert_eq!(extract_output(r#"{"ok": true, "output": ""}"#), "");
    }

    #[test]
    fn test_extract_output_reencodes_non_strings() {
        assert_eq!(
            extract_output(r#"{"output": {"title": "T", "topics": ["A"]}}"#),
            r#"{"title":"T","topics":["A"]}"#
        );
        assert_eq!(extract_output(r#"{"output": 3}"#), "3");
        assert_eq!(extract_output(r#"{"output": null}"#), "null");
    }

    #[test]
    fn test_extract_output_missing_field() {
        assert_eq!(extract_output(r#"{"result": "x"}"#), "");
    }

    #[test]
    fn test_extract_output_raw_fallback() {
        assert_eq!(extract_output("plain text reply"), "plain text reply");
        assert_eq!(extract_output("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_new_trims_endpoint() {
        let client =
            HttpInferenceClient::new(" http://127.0.0.1:8787/infer ", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8787/infer");
    }
}
