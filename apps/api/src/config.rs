use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default number of few-shot examples spliced into the rewrite prompt.
const DEFAULT_NUM_EXAMPLES: usize = 5;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// Path to the precomputed few-shot example table (JSON).
    pub examples_path: PathBuf,
    /// Number of nearest examples to select per request.
    pub num_examples: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            examples_path: std::env::var("EXAMPLES_PATH")
                .unwrap_or_else(|_| "./data/examples.json".to_string())
                .into(),
            num_examples: match std::env::var("NUM_EXAMPLES") {
                Ok(v) => parse_num_examples(&v)?,
                Err(_) => DEFAULT_NUM_EXAMPLES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Selecting zero few-shot examples would silently disable the whole
/// selection routine, so 0 is rejected alongside junk input.
fn parse_num_examples(value: &str) -> Result<usize> {
    let n = value
        .parse::<usize>()
        .context("NUM_EXAMPLES must be a positive integer")?;
    anyhow::ensure!(n > 0, "NUM_EXAMPLES must be a positive integer");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_num_examples_accepts_positive() {
        assert_eq!(parse_num_examples("5").unwrap(), 5);
        assert_eq!(parse_num_examples("1").unwrap(), 1);
    }

    #[test]
    fn test_parse_num_examples_rejects_zero() {
        assert!(parse_num_examples("0").is_err());
    }

    #[test]
    fn test_parse_num_examples_rejects_junk() {
        assert!(parse_num_examples("five").is_err());
        assert!(parse_num_examples("-1").is_err());
    }
}
