//! Microphone capture via cpal.
//!
//! Samples accumulate on the cpal callback thread into a shared buffer and
//! are teed, chunk by chunk, to an optional live feed for recognition.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::{AudioCapture, CaptureError};

pub struct MicCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
    chunk_rx: Option<mpsc::UnboundedReceiver<Vec<f32>>>,
    active: bool,
    target_sample_rate: u32,
}

impl MicCapture {
    /// Create a capture using the default input device.
    pub fn new(sample_rate: u32) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            CaptureError::DeviceUnavailable("no default input device".to_string())
        })?;

        info!(
            "Mic capture using device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self {
            device,
            config,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            chunk_rx: None,
            active: false,
            target_sample_rate: sample_rate,
        })
    }
}

fn classify_build_error(err: cpal::BuildStreamError) -> CaptureError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => {
            CaptureError::DeviceUnavailable("input device disappeared".to_string())
        }
        other => {
            let message = other.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("permission") || lowered.contains("denied") {
                CaptureError::PermissionDenied(message)
            } else {
                CaptureError::Stream(message)
            }
        }
    }
}

impl AudioCapture for MicCapture {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.active {
            return Err(CaptureError::AlreadyRecording);
        }

        {
            let mut samples = self.samples.lock().unwrap();
            samples.clear();
            samples.shrink_to_fit();
        }

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        self.chunk_rx = Some(chunk_rx);

        let samples_clone = self.samples.clone();
        let err_fn = |err| error!("Mic stream error: {}", err);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = samples_clone.lock() {
                        samples.extend_from_slice(data);
                    }
                    // Receiver may be gone (no recognizer); that is fine.
                    let _ = chunk_tx.send(data.to_vec());
                },
                err_fn,
                None,
            )
            .map_err(classify_build_error)?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        self.stream = Some(stream);
        self.active = true;

        info!("Mic capture started");
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<f32>, CaptureError> {
        if !self.active {
            return Err(CaptureError::NotRecording);
        }

        if let Some(stream) = self.stream.take() {
            debug!("Stopping mic stream");
            drop(stream);
        }

        self.active = false;
        self.chunk_rx = None;

        let samples = {
            let mut guard = self.samples.lock().unwrap();
            let s = guard.clone();
            guard.clear();
            guard.shrink_to_fit();
            s
        };

        info!("Mic capture stopped, {} samples", samples.len());
        Ok(samples)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<Vec<f32>>> {
        self.chunk_rx.take()
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        if self.active {
            debug!("Dropping active MicCapture, cleaning up");
            let _ = self.stop();
        }
    }
}
