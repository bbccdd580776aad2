//! Pre-decode request validation.

use crate::core::ExtractError;
use crate::core::config::ExtractorConfig;

/// Checks the declared content type and payload size before any bytes are
/// parsed. Both checks are O(1) regardless of payload size and have no side
/// effects.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    allowed_content_types: Vec<String>,
    max_payload_bytes: usize,
}

impl RequestValidator {
    /// Creates a validator with an explicit allow-list and size limit.
    pub fn new(allowed_content_types: Vec<String>, max_payload_bytes: usize) -> Self {
        Self {
            allowed_content_types,
            max_payload_bytes,
        }
    }

    /// Creates a validator from the service configuration.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            config.allowed_content_types.clone(),
            config.max_payload_bytes,
        )
    }

    /// Validates a request's declared content type and payload length.
    ///
    /// # Errors
    ///
    /// Returns a client-class [`ExtractError::Validation`] naming the
    /// violated constraint together with the allowed set or the limit.
    pub fn validate(&self, content_type: &str, payload_len: usize) -> Result<(), ExtractError> {
        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
        {
            return Err(ExtractError::unsupported_format(
                content_type,
                &self.allowed_content_types,
            ));
        }

        if payload_len > self.max_payload_bytes {
            return Err(ExtractError::payload_too_large(
                payload_len,
                self.max_payload_bytes,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> RequestValidator {
        RequestValidator::new(
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            10 * 1024 * 1024,
        )
    }

    #[test]
    fn allowed_type_within_limit_passes() {
        assert!(validator().validate("image/jpeg", 1024).is_ok());
        // Case-insensitive media type match.
        assert!(validator().validate("Image/PNG", 1024).is_ok());
    }

    #[test]
    fn disallowed_type_lists_the_allowed_set() {
        let err = validator().validate("image/gif", 1024).unwrap_err();
        assert_eq!(err.status_code(), 400);
        let msg = err.to_string();
        assert!(msg.contains("Unsupported"));
        assert!(msg.contains("image/gif"));
        assert!(msg.contains("image/jpeg"));
        assert!(msg.contains("image/webp"));
    }

    #[test]
    fn oversized_payload_mentions_the_limit() {
        let err = validator()
            .validate("image/jpeg", 10 * 1024 * 1024 + 1)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("exceeds"));
        assert!(err.to_string().contains("10.0 MB"));
    }

    #[test]
    fn limit_is_inclusive() {
        assert!(validator().validate("image/jpeg", 10 * 1024 * 1024).is_ok());
    }
}
