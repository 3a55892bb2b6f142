//! Template loading and management

use grpc_transcoder_common::{Result, TranscoderError};
use tera::Tera;

/// Name the EnvoyFilter template is registered under
pub const ENVOY_FILTER: &str = "envoy_filter.yaml";

/// Build the template engine with the embedded EnvoyFilter template
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.add_raw_template(
        ENVOY_FILTER,
        include_str!("../templates/envoy_filter.yaml.tera"),
    )
    .map_err(|e| TranscoderError::Render(format!("failed to load EnvoyFilter template: {e}")))?;

    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_parses() {
        let tera = load_templates().unwrap();
        assert!(tera.get_template_names().any(|n| n == ENVOY_FILTER));
    }
}
