use anyhow::Result;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::registry::{DbProvider, DbProviderId, connect_options};
use crate::config::DatabaseConfig;

pub struct PostgresDbProvider;

#[async_trait]
impl DbProvider for PostgresDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Postgres
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with("postgres://") || normalized.starts_with("postgresql://")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(sea_orm::Database::connect(connect_options(cfg, cfg.max_connections)).await?)
    }
}
