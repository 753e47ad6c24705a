//! Chunked HTTP recognition provider.
//!
//! Buffers the live feed into fixed-length windows, posts each window as a
//! base64 WAV to a transcription endpoint, and emits the returned text as a
//! final segment. An empty result means the window held no speech.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use async_trait::async_trait;

use super::{AudioFeed, RecognizerError, RecognizerEvent, SpeechRecognizer};
use crate::audio::encode_wav;

#[derive(Debug, Serialize)]
struct ChunkPayload {
    /// Base64-encoded WAV window.
    content: String,
    language: String,
    interim: bool,
}

#[derive(Debug, Deserialize)]
struct ChunkResponse {
    result: ChunkResult,
}

#[derive(Debug, Deserialize)]
struct ChunkResult {
    text: String,
}

pub struct ChunkedApiRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    chunk_seconds: u64,
    sample_rate: u32,
}

impl ChunkedApiRecognizer {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        chunk_seconds: u64,
        sample_rate: u32,
    ) -> Self {
        info!("Initialized chunked recognition provider: {}", endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            chunk_seconds: chunk_seconds.max(1),
            sample_rate,
        }
    }

    async fn transcribe_window(
        client: &reqwest::Client,
        endpoint: &str,
        api_key: Option<&str>,
        language: &str,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, RecognizerError> {
        let wav = encode_wav(samples, sample_rate)
            .map_err(|e| RecognizerError::AudioHiccup(e.to_string()))?;

        let payload = ChunkPayload {
            content: BASE64.encode(&wav),
            language: language.to_string(),
            interim: false,
        };

        let mut request = client.post(endpoint).json(&payload);
        if let Some(key) = api_key {
            request = request.header("Authorization", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RecognizerError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecognizerError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RecognizerError::Transport(format!(
                "recognition endpoint returned status {}: {}",
                status, body
            )));
        }

        let parsed: ChunkResponse = serde_json::from_str(&body)
            .map_err(|e| RecognizerError::Transport(format!("unreadable response: {e}")))?;

        Ok(parsed.result.text)
    }
}

#[async_trait]
impl SpeechRecognizer for ChunkedApiRecognizer {
    async fn start(
        &mut self,
        language: &str,
        mut audio: AudioFeed,
    ) -> Result<mpsc::UnboundedReceiver<RecognizerEvent>, RecognizerError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let language = language.to_string();
        let window = (self.chunk_seconds * u64::from(self.sample_rate)) as usize;
        let sample_rate = self.sample_rate;

        tokio::spawn(async move {
            let mut buffer: Vec<f32> = Vec::with_capacity(window);

            loop {
                let feed_open = match audio.recv().await {
                    Some(chunk) => {
                        buffer.extend_from_slice(&chunk);
                        true
                    }
                    // Feed closed: the capture stopped. Flush the remainder.
                    None => false,
                };

                if buffer.len() >= window || (!feed_open && !buffer.is_empty()) {
                    let samples = std::mem::take(&mut buffer);
                    let result = Self::transcribe_window(
                        &client,
                        &endpoint,
                        api_key.as_deref(),
                        &language,
                        &samples,
                        sample_rate,
                    )
                    .await;

                    let event = match result {
                        Ok(text) if text.trim().is_empty() => {
                            debug!("Recognition window held no speech");
                            RecognizerEvent::Error(RecognizerError::NoSpeech)
                        }
                        Ok(text) => RecognizerEvent::Segment {
                            text,
                            is_final: true,
                        },
                        Err(e) => {
                            warn!("Recognition window failed: {}", e);
                            RecognizerEvent::Error(e)
                        }
                    };

                    if event_tx.send(event).is_err() {
                        return;
                    }
                }

                if !feed_open {
                    let _ = event_tx.send(RecognizerEvent::Ended);
                    return;
                }
            }
        });

        Ok(event_rx)
    }
}
