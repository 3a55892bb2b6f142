//! Common types for the gRPC transcoder generator
//!
//! This crate contains the error taxonomy and the rendering context shared
//! across the descriptor, generator, and CLI components.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while producing a transcoder filter
#[derive(Error, Debug)]
pub enum TranscoderError {
    #[error("descriptor is too large ({size} bytes); custom resources cannot be larger than {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transcoder operations
pub type Result<T> = std::result::Result<T, TranscoderError>;

/// Rendering context for the EnvoyFilter artifact.
///
/// Field names double as template variable names. The descriptor bytes are
/// passed to the generator separately and embedded as base64.
#[derive(Debug, Clone, Serialize)]
pub struct FilterParams {
    /// Value of the `app` workload label the filter attaches to
    pub service_name: String,
    /// Listener port the transcoding filter is patched onto
    pub port_number: u16,
    /// Sorted, fully-qualified names of the services to transcode
    pub proto_services: Vec<String>,
    /// JSON pretty printing in transcoded responses
    pub add_whitespace: bool,
    /// Convert gRPC status trailers to JSON error bodies
    pub convert_grpc_status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message_carries_both_sizes() {
        let err = TranscoderError::TooLarge {
            size: 1_000_001,
            limit: 1_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000001"));
        assert!(msg.contains("1000000"));
    }
}
