//! Descriptor loading and the decode boundary

use grpc_transcoder_common::{Result, TranscoderError};
use prost::Message;
use prost_types::FileDescriptorSet;
use std::fs;
use std::path::Path;

/// Kubernetes custom resources hold at most a megabyte of data; a
/// descriptor larger than this cannot be delivered through one.
pub const MAX_DESCRIPTOR_BYTES: usize = 1_000_000;

/// Reject payloads the downstream custom resource cannot hold.
///
/// Runs strictly before decoding, so oversized input fails with an
/// actionable message instead of a parse error.
pub fn check_size(len: usize) -> Result<()> {
    if len > MAX_DESCRIPTOR_BYTES {
        return Err(TranscoderError::TooLarge {
            size: len,
            limit: MAX_DESCRIPTOR_BYTES,
        });
    }
    Ok(())
}

/// A loaded descriptor set: the raw bytes plus their decoded form.
///
/// The raw bytes are retained because the generator embeds them verbatim
/// (base64) in the emitted filter.
#[derive(Debug)]
pub struct DescriptorSource {
    bytes: Vec<u8>,
    set: FileDescriptorSet,
}

impl DescriptorSource {
    /// Load a binary `FileDescriptorSet` from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Decode a binary `FileDescriptorSet`, enforcing the size limit first
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        check_size(bytes.len())?;
        let set = FileDescriptorSet::decode(bytes.as_slice()).map_err(|e| {
            TranscoderError::Decode(format!("failed to decode FileDescriptorSet: {e}"))
        })?;
        Ok(Self { bytes, set })
    }

    /// Raw descriptor bytes as read from the source
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded descriptor set
    pub fn set(&self) -> &FileDescriptorSet {
        &self.set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_guard_boundary() {
        assert!(check_size(0).is_ok());
        assert!(check_size(MAX_DESCRIPTOR_BYTES).is_ok());

        let err = check_size(MAX_DESCRIPTOR_BYTES + 1).unwrap_err();
        assert!(matches!(
            err,
            TranscoderError::TooLarge {
                size: 1_000_001,
                limit: 1_000_000,
            }
        ));
    }

    #[test]
    fn test_oversized_payload_rejected_before_decode() {
        // Junk that would also fail to decode; the size guard must win.
        let bytes = vec![0xff; MAX_DESCRIPTOR_BYTES + 1];
        let err = DescriptorSource::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, TranscoderError::TooLarge { .. }));
    }

    #[test]
    fn test_empty_payload_is_an_empty_set() {
        let source = DescriptorSource::from_bytes(Vec::new()).unwrap();
        assert!(source.set().file.is_empty());
        assert!(source.bytes().is_empty());
    }

    #[test]
    fn test_malformed_payload_is_a_decode_error() {
        let err = DescriptorSource::from_bytes(vec![0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, TranscoderError::Decode(_)));
    }
}
