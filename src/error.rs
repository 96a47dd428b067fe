//! Errors at the host edge
//!
//! The simulation core never fails. Only loading settings, writing recordings
//! and snapshots, and opening an output device can.

/// Error types for host-side operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed or serialized
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Error writing a WAV recording
    #[error("Audio file write error: {0}")]
    Wav(#[from] hound::Error),

    /// Error encoding a frame snapshot
    #[error("Image write error: {0}")]
    Image(#[from] image::ImageError),

    /// Audio device could not be opened
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Recorder thread went away before finishing
    #[error("Recorder stopped unexpectedly")]
    RecorderStopped,
}

/// Result alias for host-side operations
pub type Result<T> = std::result::Result<T, Error>;
