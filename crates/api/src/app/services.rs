use std::sync::Arc;

use anyhow::Context;

use tenantgate_auth::{PasswordHasher, TokenIssuer};
use tenantgate_infra::store::{CredentialStore, InMemoryCredentialStore, PostgresCredentialStore};
use tenantgate_infra::IdentityService;

use crate::config::AppConfig;

/// Shared handler state.
#[derive(Clone)]
pub struct AppServices {
    pub identity: IdentityService,
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = build_store(config).await?;
    let hasher = PasswordHasher::from_config(&config.auth).context("invalid password hashing parameters")?;
    let tokens = TokenIssuer::from_config(&config.auth).context("invalid token configuration")?;

    Ok(AppServices {
        identity: IdentityService::new(store, hasher, tokens),
    })
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory credential store (data is lost on restart)");
        return Ok(Arc::new(InMemoryCredentialStore::new()));
    };

    let store = PostgresCredentialStore::connect(url, config.database_max_connections)
        .await
        .context("failed to connect to Postgres")?;
    store.migrate().await.context("failed to apply schema")?;
    tracing::info!("using Postgres credential store");
    Ok(Arc::new(store))
}
