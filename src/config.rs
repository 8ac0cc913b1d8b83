use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Seconds between samples once the loop is running.
    pub sample_interval_secs: u64,
    /// Burn-in calibration duration in seconds. The recommended 300 s gives
    /// the gas hot plate time to settle before the baseline is taken.
    pub burn_in_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            sample_interval_secs: optional("SAMPLE_INTERVAL_SECS", "1")
                .parse()
                .context("SAMPLE_INTERVAL_SECS must be a positive integer")?,
            burn_in_secs: optional("BURN_IN_SECS", "300")
                .parse()
                .context("BURN_IN_SECS must be a positive integer")?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var manipulation is process-global, so these tests only exercise
    // the pure helpers against keys they own.

    #[test]
    fn optional_falls_back_to_default() {
        assert_eq!(optional("ICS_TEST_UNSET_KEY", "fallback"), "fallback");
    }

    #[test]
    fn required_reports_the_missing_key() {
        let err = required("ICS_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("ICS_TEST_MISSING_KEY"));
    }
}
