//! Audio capture abstraction and WAV artifact finalization.

use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

pub mod mic;

pub use mic::MicCapture;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// Microphone access was denied. The session must not start.
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    /// No usable input device.
    #[error("no input device available: {0}")]
    DeviceUnavailable(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("capture already running")]
    AlreadyRecording,

    #[error("capture not running")]
    NotRecording,

    #[error("failed to write audio artifact: {0}")]
    Artifact(#[from] hound::Error),
}

/// An audio capture source for one recording.
///
/// Samples accumulate internally between `start` and `stop`; `stop` returns
/// the full capture for artifact finalization. `take_chunks` hands out the
/// live chunk feed once per start, for callers that tee audio into a
/// recognizer while the capture is running.
pub trait AudioCapture {
    fn start(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self) -> Result<Vec<f32>, CaptureError>;

    fn is_active(&self) -> bool;

    fn sample_rate(&self) -> u32;

    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<Vec<f32>>>;
}

/// Finalize captured samples as a mono 32-bit float WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), CaptureError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!("Audio artifact saved: {:?} ({} samples)", path, samples.len());
    Ok(())
}

/// Encode samples as an in-memory WAV, for chunked recognition uploads.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");
        let samples = vec![0.0f32, 0.5, -0.5, 1.0];

        write_wav(&path, &samples, 16000).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        let read: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn test_encode_wav_produces_riff_header() {
        let bytes = encode_wav(&[0.1f32, 0.2], 16000).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_encode_wav_empty_is_valid() {
        let bytes = encode_wav(&[], 16000).unwrap();
        assert!(bytes.len() >= 44);
    }
}
