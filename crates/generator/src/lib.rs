//! EnvoyFilter generation for gRPC-JSON transcoding
//!
//! This crate assembles the output artifact: the matched service list, the
//! base64-encoded descriptor, and the passthrough configuration values are
//! rendered into an Istio `EnvoyFilter` document that installs Envoy's
//! `grpc_json_transcoder` HTTP filter for a workload.

mod templates;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use grpc_transcoder_common::{FilterParams, Result, TranscoderError};
use std::fs;
use std::path::Path;
use tera::Tera;

/// EnvoyFilter document generator.
///
/// The template engine is built once, at startup; a template that does not
/// parse aborts construction instead of surfacing at render time.
pub struct EnvoyFilterGenerator {
    tera: Tera,
}

impl EnvoyFilterGenerator {
    pub fn new() -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera })
    }

    /// Render the EnvoyFilter document for one descriptor.
    ///
    /// The descriptor bytes are embedded verbatim as standard base64 in the
    /// filter's `proto_descriptor_bin` field.
    pub fn render(&self, params: &FilterParams, descriptor: &[u8]) -> Result<String> {
        let mut context = tera::Context::from_serialize(params)
            .map_err(|e| TranscoderError::Render(format!("invalid template context: {e}")))?;
        context.insert("descriptor_binary", &STANDARD.encode(descriptor));

        self.tera
            .render(templates::ENVOY_FILTER, &context)
            .map_err(|e| TranscoderError::Render(format!("template error: {e}")))
    }

    /// Render the document and write it to a file
    pub fn write_to_path(
        &self,
        params: &FilterParams,
        descriptor: &[u8],
        path: &Path,
    ) -> Result<()> {
        let rendered = self.render(params, descriptor)?;
        fs::write(path, rendered)?;
        Ok(())
    }
}
