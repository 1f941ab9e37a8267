//! Process configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use bizdir_core::error::{DirectoryError, DirectoryResult};
use bizdir_core::models::account::CreateAccount;
use bizdir_db::DbConfig;

/// Which key-value backend holds the durable mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    File(PathBuf),
    Surreal(DbConfig),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub backend: Backend,
    pub simulated_latency: Duration,
    /// Account that owns the sample listings; `None` disables seeding.
    pub seed_owner: Option<CreateAccount>,
}

impl ServerConfig {
    pub fn from_env() -> DirectoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DirectoryResult<Self> {
        let backend = match lookup("BIZDIR_STORE").as_deref().unwrap_or("memory") {
            "memory" => Backend::Memory,
            "file" => Backend::File(
                lookup("BIZDIR_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("bizdir.json")),
            ),
            "surreal" => {
                let defaults = DbConfig::default();
                Backend::Surreal(DbConfig {
                    url: lookup("SURREAL_URL").unwrap_or(defaults.url),
                    namespace: lookup("SURREAL_NS").unwrap_or(defaults.namespace),
                    database: lookup("SURREAL_DB").unwrap_or(defaults.database),
                    username: lookup("SURREAL_USER").unwrap_or(defaults.username),
                    password: lookup("SURREAL_PASS").unwrap_or(defaults.password),
                })
            }
            other => {
                return Err(DirectoryError::Internal(format!(
                    "BIZDIR_STORE must be memory, file or surreal, got '{other}'"
                )));
            }
        };

        let simulated_latency = match lookup("BIZDIR_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| DirectoryError::Internal(format!("BIZDIR_LATENCY_MS '{raw}': {e}")))?,
            None => Duration::from_millis(800),
        };

        let seed = lookup("BIZDIR_SEED").is_some_and(|v| matches!(v.as_str(), "1" | "true"));
        let seed_owner = seed.then(|| CreateAccount {
            name: lookup("BIZDIR_SEED_NAME").unwrap_or_else(|| "Sample Owner".into()),
            email: lookup("BIZDIR_SEED_EMAIL").unwrap_or_else(|| "samples@bizdir.local".into()),
            password: lookup("BIZDIR_SEED_PASSWORD").unwrap_or_else(|| "samples".into()),
        });

        Ok(Self {
            backend,
            simulated_latency,
            seed_owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(vars: &[(&str, &str)]) -> DirectoryResult<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_memory_without_seeding() {
        let config = from(&[]).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.simulated_latency, Duration::from_millis(800));
        assert!(config.seed_owner.is_none());
    }

    #[test]
    fn file_backend_uses_given_path() {
        let config = from(&[("BIZDIR_STORE", "file"), ("BIZDIR_FILE", "/tmp/dir.json")]).unwrap();
        assert_eq!(config.backend, Backend::File(PathBuf::from("/tmp/dir.json")));
    }

    #[test]
    fn surreal_backend_overrides_defaults() {
        let config = from(&[("BIZDIR_STORE", "surreal"), ("SURREAL_NS", "staging")]).unwrap();
        match config.backend {
            Backend::Surreal(db) => {
                assert_eq!(db.namespace, "staging");
                assert_eq!(db.database, "main");
            }
            other => panic!("expected surreal backend, got {other:?}"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(from(&[("BIZDIR_STORE", "redis")]).is_err());
    }

    #[test]
    fn latency_and_seed_are_parsed() {
        let config = from(&[
            ("BIZDIR_LATENCY_MS", "0"),
            ("BIZDIR_SEED", "true"),
            ("BIZDIR_SEED_EMAIL", "owner@example.com"),
        ])
        .unwrap();
        assert!(config.simulated_latency.is_zero());
        assert_eq!(
            config.seed_owner.map(|o| o.email).as_deref(),
            Some("owner@example.com")
        );

        assert!(from(&[("BIZDIR_LATENCY_MS", "fast")]).is_err());
    }
}
