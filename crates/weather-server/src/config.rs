//! Server Configuration

use agent_core::RetentionPolicy;
use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Listener and history settings read from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub retention: RetentionPolicy,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `BIND_ADDR` (default `0.0.0.0:3000`) and `HISTORY_MAX_TURNS`
    /// (unset means unbounded)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        let retention = match lookup("HISTORY_MAX_TURNS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let max: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("HISTORY_MAX_TURNS must be a whole number, got '{raw}'"))?;
                RetentionPolicy::max_turns(max)
            }
            None => RetentionPolicy::unbounded(),
        };

        Ok(Self {
            bind_addr,
            retention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.retention, RetentionPolicy::unbounded());
    }

    #[test]
    fn test_history_limit() {
        let config = ServerConfig::from_lookup(|key| match key {
            "HISTORY_MAX_TURNS" => Some("20".into()),
            "BIND_ADDR" => Some("127.0.0.1:8080".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.retention, RetentionPolicy::max_turns(20));
    }

    #[test]
    fn test_invalid_history_limit() {
        let err = ServerConfig::from_lookup(|key| {
            (key == "HISTORY_MAX_TURNS").then(|| "lots".into())
        })
        .unwrap_err();

        assert!(err.to_string().contains("HISTORY_MAX_TURNS"));
    }
}
