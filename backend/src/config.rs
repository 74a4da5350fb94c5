use std::net::SocketAddr;
use std::path::PathBuf;

const BIND_ADDR_VAR: &str = "TASKS_BIND_ADDR";
const DATABASE_VAR: &str = "TASKS_DATABASE";
const TOKEN_VAR: &str = "BEARER_TOKEN";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE: &str = "tasks.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    Missing(&'static str),

    #[error("{var} is not a socket address: {value:?}")]
    InvalidAddr { var: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub bearer_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr {
                var: BIND_ADDR_VAR,
                value: bind_addr.clone(),
            })?;

        let database_path = lookup(DATABASE_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_DATABASE), PathBuf::from);

        let bearer_token = lookup(TOKEN_VAR)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_VAR))?;

        Ok(Self {
            bind_addr,
            database_path,
            bearer_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = load(&[("BEARER_TOKEN", "s3cret")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_path, PathBuf::from("tasks.db"));
        assert_eq!(config.bearer_token, "s3cret");
    }

    #[test]
    fn overrides_are_honoured() {
        let config = load(&[
            ("BEARER_TOKEN", "t"),
            ("TASKS_BIND_ADDR", "127.0.0.1:8080"),
            ("TASKS_DATABASE", "/var/lib/tasks/tasks.db"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/tasks/tasks.db")
        );
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("BEARER_TOKEN"))));
        assert!(matches!(
            load(&[("BEARER_TOKEN", "")]),
            Err(ConfigError::Missing("BEARER_TOKEN"))
        ));
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = load(&[("BEARER_TOKEN", "t"), ("TASKS_BIND_ADDR", "nope")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TASKS_BIND_ADDR is not a socket address: \"nope\""
        );
    }
}
