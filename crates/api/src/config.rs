//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::Context;

use tenantgate_auth::AuthConfig;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory credential store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let mut auth = AuthConfig {
            jwt_secret,
            ..AuthConfig::default()
        };
        if let Some(ttl) = get("JWT_TTL_SECS") {
            auth.token_ttl_secs = Some(ttl.parse().context("JWT_TTL_SECS must be a number of seconds")?);
        }
        if let Some(cost) = get("PASSWORD_HASH_COST") {
            auth.password_hash_cost = cost.parse().context("PASSWORD_HASH_COST must be a positive integer")?;
        }
        if let Some(memory) = get("PASSWORD_HASH_MEMORY_KIB") {
            auth.password_hash_memory_kib = memory
                .parse()
                .context("PASSWORD_HASH_MEMORY_KIB must be a positive integer")?;
        }

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(n) => n.parse().context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 10,
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            database_max_connections,
            auth,
        })
    }

}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url, None);
        assert_eq!(config.auth.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.auth.token_ttl_secs, None);
        assert_eq!(config.auth.password_hash_cost, AuthConfig::default().password_hash_cost);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/tenantgate"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_SECS", "3600"),
            ("PASSWORD_HASH_COST", "3"),
            ("PASSWORD_HASH_MEMORY_KIB", "8192"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tenantgate"));
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_secs, Some(3600));
        assert_eq!(config.auth.password_hash_cost, 3);
        assert_eq!(config.auth.password_hash_memory_kib, 8192);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  "), ("JWT_SECRET", "")])).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.auth.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(AppConfig::from_lookup(lookup(&[("JWT_TTL_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
    }
}
