use imu_traits::ImuError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorError {
    /// The port does not exist, cannot be opened, or the source is not ready.
    #[error("Setup error on {port}: {reason}")]
    Setup { port: String, reason: String },
    /// Read failure, disconnect, or a short read in the middle of a frame.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Frame sink closed")]
    SinkClosed,
    #[error("No frame available")]
    SinkEmpty,
    #[error("Decoder thread panicked")]
    DecoderPanicked,
}

impl RazorError {
    pub(crate) fn setup(port: impl Into<String>, reason: impl ToString) -> Self {
        RazorError::Setup {
            port: port.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<RazorError> for ImuError {
    fn from(err: RazorError) -> Self {
        match err {
            RazorError::Setup { .. } => ImuError::ConfigurationError(err.to_string()),
            RazorError::Io(e) => ImuError::from(e),
            RazorError::SinkClosed | RazorError::SinkEmpty => ImuError::ReadError(err.to_string()),
            RazorError::DecoderPanicked => ImuError::Other(err.to_string()),
        }
    }
}
