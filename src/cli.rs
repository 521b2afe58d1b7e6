//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::CompletionConfig;

/// Top-level CLI parser for `oneshot`.
#[derive(Debug, Parser)]
#[command(name = "oneshot", version, about = "Send a prompt file to a chat model, save the reply")]
pub struct Cli {
    /// File holding the prompt text.
    pub input: PathBuf,
    /// File the completion is written to (overwritten if present).
    pub output: PathBuf,
    /// Model identifier to request.
    #[arg(long, env = "ONESHOT_MODEL")]
    pub model: Option<String>,
    /// Sampling temperature, between 0.0 and 2.0.
    #[arg(long, env = "ONESHOT_TEMPERATURE", value_parser = parse_temperature)]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    #[arg(long, env = "ONESHOT_MAX_TOKENS", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,
    /// Base URL of the chat-completions service.
    #[arg(long, env = "ONESHOT_BASE_URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Builds the completion config: defaults, overridden by flags or env.
    #[must_use]
    pub fn completion_config(&self) -> CompletionConfig {
        let defaults = CompletionConfig::default();
        CompletionConfig {
            model: self.model.clone().unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
        }
    }
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
    use clap::Parser;

    #[test]
    fn parses_input_and_output_paths() {
        let cli = Cli::parse_from(["oneshot", "in.txt", "out.txt"]);
        assert_eq!(cli.input.to_str(), Some("in.txt"));
        assert_eq!(cli.output.to_str(), Some("out.txt"));
    }

    #[test]
    fn rejects_single_positional() {
        assert!(Cli::try_parse_from(["oneshot", "in.txt"]).is_err());
    }

    #[test]
    fn rejects_no_positionals() {
        assert!(Cli::try_parse_from(["oneshot"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "oneshot",
            "in.txt",
            "out.txt",
            "--model",
            "gpt-4o-mini",
            "--temperature",
            "0",
        ]);
        let config = cli.completion_config();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.temperature.abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn no_flags_keep_defaults() {
        let cli = Cli::parse_from(["oneshot", "in.txt", "out.txt"]);
        if std::env::var_os("ONESHOT_MODEL").is_none() {
            assert_eq!(cli.completion_config().model, DEFAULT_MODEL);
        }
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let result =
            Cli::try_parse_from(["oneshot", "in.txt", "out.txt", "--temperature", "3.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_max_tokens() {
        let result = Cli::try_parse_from(["oneshot", "in.txt", "out.txt", "--max-tokens", "0"]);
        assert!(result.is_err());
    }
}
