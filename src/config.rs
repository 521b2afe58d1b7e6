//! Completion parameters and credential resolution.

use std::env;
use std::fmt;

use crate::error::RunError;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Model requested when no override is given.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Sampling temperature used when no override is given.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Output token bound used when no override is given.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Chat-completions service root used when no override is given.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Fixed parameters of the single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// Model identifier sent with the request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens the service may generate.
    pub max_tokens: u32,
    /// Service root; `/chat/completions` is appended.
    pub base_url: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Secret token authorizing calls to the completion service.
///
/// Guaranteed non-empty. `Debug` never prints the token.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Reads the credential from [`API_KEY_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`RunError::MissingCredential`] if the variable is unset,
    /// not valid unicode, or empty.
    pub fn from_env() -> Result<Self, RunError> {
        Self::from_value(env::var(API_KEY_VAR).ok())
    }

    /// Validates an already-fetched credential value.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::MissingCredential`] for `None` or an empty string.
    pub fn from_value(value: Option<String>) -> Result<Self, RunError> {
        match value {
            Some(token) if !token.is_empty() => Ok(Self(token)),
            _ => Err(RunError::MissingCredential { var: API_KEY_VAR }),
        }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CompletionConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn missing_credential_is_rejected() {
        let err = Credential::from_value(None).unwrap_err();
        assert!(matches!(err, RunError::MissingCredential { var: "OPENAI_API_KEY" }));
    }

    #[test]
    fn empty_credential_is_rejected() {
        assert!(Credential::from_value(Some(String::new())).is_err());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::from_value(Some("sk-secret".into())).unwrap();
        assert_eq!(credential.expose(), "sk-secret");
        assert!(!format!("{credential:?}").contains("sk-secret"));
    }
}
