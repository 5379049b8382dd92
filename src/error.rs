//! Error types for codeshot

use thiserror::Error;

/// Result type alias for codeshot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, rendering, exporting or sharing
#[derive(Error, Debug)]
pub enum Error {
    /// The share token is not valid base64 or does not hold a document record
    #[error("Malformed share token: {0}")]
    DecodeMalformed(String),

    /// The document could not be serialized into a token
    #[error("Failed to encode document: {0}")]
    EncodeFailed(String),

    /// Rasterizing the preview region failed
    #[error("Snapshot capture failed: {0}")]
    ExportCaptureFailed(String),

    /// Writing the share URL to the clipboard was refused
    #[error("Clipboard write denied: {0}")]
    PublishClipboardDenied(String),

    /// Laying out or painting the preview failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A transient action was requested while another one is still pending
    #[error("Session busy: {0} already in progress")]
    SessionBusy(&'static str),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether retrying the same action may succeed without any edit.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ExportCaptureFailed(_)
                | Error::PublishClipboardDenied(_)
                | Error::SessionBusy(_)
                | Error::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_and_clipboard_failures_are_retryable() {
        assert!(Error::ExportCaptureFailed("tainted".into()).is_retryable());
        assert!(Error::PublishClipboardDenied("no permission".into()).is_retryable());
        assert!(!Error::DecodeMalformed("noise".into()).is_retryable());
        assert!(!Error::ConfigError("zero line height".into()).is_retryable());
    }

    #[test]
    fn messages_name_the_failure() {
        let e = Error::PublishClipboardDenied("permission denied".into());
        assert_eq!(e.to_string(), "Clipboard write denied: permission denied");
        let e = Error::SessionBusy("export");
        assert_eq!(e.to_string(), "Session busy: export already in progress");
    }
}
