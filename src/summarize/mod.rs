//! Summarization client for the Gemini `generateContent` endpoint.
//!
//! Sends the transcript with a schema-constrained generation config and
//! parses the structured minutes embedded in the response.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info};

pub mod minutes;

pub use minutes::{ActionPlanEntry, MeetingMinutes, ParticipantContribution};

use crate::config::SummarizerConfig;
use minutes::{build_request, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Rejected by the caller before any request is built.
    #[error("transcript is empty; nothing to summarize")]
    EmptyTranscript,

    #[error("summarizer is not configured: an API key is required")]
    NotConfigured,

    #[error("summarization endpoint returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("summarization response did not match the expected schema: {detail}")]
    MalformedResponse { detail: String },

    #[error("failed to reach summarization endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct GeminiClient {
    client: reqwest::Client,
    url: String,
}

impl GeminiClient {
    /// Builds a client from config. A custom `api_endpoint` is used verbatim;
    /// otherwise the hosted URL is derived from model and API key.
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummarizeError> {
        let url = match &config.api_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|k| !k.is_empty())
                    .ok_or(SummarizeError::NotConfigured)?;
                format!(
                    "{}/{}:generateContent?key={}",
                    DEFAULT_BASE_URL, config.model, api_key
                )
            }
        };

        Ok(Self {
            client: reqwest::Client::new(),
            url,
        })
    }

    /// Requests structured minutes for a transcript.
    ///
    /// Non-success responses surface as [`SummarizeError::Upstream`] with the
    /// body preserved; a success body that cannot be read as the schema
    /// surfaces as [`SummarizeError::MalformedResponse`]. Neither writes any
    /// state, so the call is safely retryable.
    pub async fn summarize(
        &self,
        transcript: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<MeetingMinutes, SummarizeError> {
        let request = build_request(transcript, started_at, ended_at);

        debug!("Requesting minutes for {} chars of transcript", transcript.len());

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Summarization request failed with status {}: {}", status, body);
            return Err(SummarizeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| SummarizeError::MalformedResponse {
                detail: format!("invalid response envelope: {e}"),
            })?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| SummarizeError::MalformedResponse {
                detail: "response carried no candidate text".to_string(),
            })?;

        let minutes: MeetingMinutes =
            serde_json::from_str(text).map_err(|e| SummarizeError::MalformedResponse {
                detail: format!("candidate text is not valid minutes JSON: {e}"),
            })?;

        info!(
            "Minutes generated: {} action items, {} topics",
            minutes.action_plan.len(),
            minutes.topics.len()
        );

        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key_without_endpoint() {
        let config = SummarizerConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(SummarizeError::NotConfigured)
        ));
    }

    #[test]
    fn test_custom_endpoint_skips_key_requirement() {
        let config = SummarizerConfig {
            api_endpoint: Some("http://127.0.0.1:1/v1".to_string()),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.url, "http://127.0.0.1:1/v1");
    }

    #[test]
    fn test_default_url_embeds_model_and_key() {
        let config = SummarizerConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert!(client.url.starts_with(DEFAULT_BASE_URL));
        assert!(client.url.contains(":generateContent?key=secret"));
    }
}
