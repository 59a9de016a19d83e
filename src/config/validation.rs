use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("library name must not be empty")]
    EmptyLibraryName,

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("crossref_url must be an http(s) URL, got '{0}'")]
    InvalidCrossrefUrl(String),
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_library(config)?;
    validate_limits(config)?;
    validate_enrichment(config)?;
    Ok(())
}

fn validate_library(config: &Config) -> Result<(), ValidationError> {
    if config.library.name.trim().is_empty() {
        return Err(ValidationError::EmptyLibraryName);
    }
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    let checks = [
        ("server.max_payload_bytes", config.server.max_payload_bytes.as_u64()),
        ("fetch.max_attachment_bytes", config.fetch.max_attachment_bytes.as_u64()),
        ("fetch.connect_timeout_secs", config.fetch.connect_timeout_secs),
        ("fetch.request_timeout_secs", config.fetch.request_timeout_secs),
        (
            "pipeline.max_concurrent_items",
            config.pipeline.max_concurrent_items as u64,
        ),
    ];

    for (field, value) in checks {
        if value == 0 {
            return Err(ValidationError::ZeroValue { field });
        }
    }

    Ok(())
}

/// Only checked when enrichment is on; a disabled lookup never dials out
fn validate_enrichment(config: &Config) -> Result<(), ValidationError> {
    let url = &config.enrichment.crossref_url;
    if config.enrichment.enabled
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        return Err(ValidationError::InvalidCrossrefUrl(url.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_blank_library_name() {
        let mut config = Config::default();
        config.library.name = "   ".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::EmptyLibraryName)
        ));
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = Config::default();
        config.pipeline.max_concurrent_items = 0;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroValue {
                field: "pipeline.max_concurrent_items"
            })
        ));
    }

    #[test]
    fn test_zero_payload_limit() {
        let mut config = Config::default();
        config.server.max_payload_bytes = ByteSize(0);

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroValue { .. })
        ));
    }

    #[test]
    fn test_crossref_url_scheme() {
        let mut config = Config::default();
        config.enrichment.crossref_url = "ftp://api.crossref.org".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidCrossrefUrl(_))
        ));

        config.enrichment.enabled = false;
        assert!(validate(&config).is_ok());
    }
}
