//! # Harvester Bootstrap
//!
//! Wires the PostgreSQL-backed collaborators around an injected search
//! source. Configuration is resolved and validated before any connection is
//! made, so a bad configuration halts the process before the checkpoint or
//! the downstream queue is touched.

use super::poller::{PollSettings, PollSummary, SearchPoller};
use crate::checkpoint::PgCheckpointStore;
use crate::config::{ConfigLoader, HarvesterConfig};
use crate::dispatch::PgmqDispatcher;
use crate::error::Result;
use crate::search::SearchSource;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// A configured harvester ready to run poll cycles
pub struct HarvesterSystem {
    config: HarvesterConfig,
    pool: PgPool,
    poller: SearchPoller,
}

impl std::fmt::Debug for HarvesterSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvesterSystem")
            .field("poller", &self.poller)
            .field("database_url", &self.config.redacted_database_url())
            .finish()
    }
}

impl HarvesterSystem {
    /// Load configuration from file and `HARVESTER_` environment, then
    /// bootstrap.
    pub async fn from_env(search: Arc<dyn SearchSource>) -> Result<Self> {
        crate::logging::init_logging();
        let config = ConfigLoader::from_process_env().load()?;
        Self::bootstrap(config, search).await
    }

    pub async fn bootstrap(config: HarvesterConfig, search: Arc<dyn SearchSource>) -> Result<Self> {
        config.validate()?;
        let settings = PollSettings::from_config(&config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        info!(database_url = %config.redacted_database_url(), "🔧 Connected to database");

        let checkpoint = PgCheckpointStore::new(
            pool.clone(),
            config.checkpoint.table_name.clone(),
            config.checkpoint.record_key.clone(),
        )?;
        if config.checkpoint.resumable {
            checkpoint.ensure_schema().await?;
        }

        let dispatcher = PgmqDispatcher::new(pool.clone(), config.dispatch.processor_queue.clone())?;
        dispatcher.ensure_queue().await?;

        let poller = SearchPoller::new(settings, search, Arc::new(dispatcher), Arc::new(checkpoint));

        info!(
            query = %config.search.text,
            resumable = config.checkpoint.resumable,
            processor_queue = %config.dispatch.processor_queue,
            "✅ Harvester bootstrapped"
        );

        Ok(Self {
            config,
            pool,
            poller,
        })
    }

    /// Run a single poll cycle
    pub async fn run_once(&self) -> Result<PollSummary> {
        self.poller.poll().await
    }

    pub fn config(&self) -> &HarvesterConfig {
        &self.config
    }

    pub fn poller(&self) -> &SearchPoller {
        &self.poller
    }

    pub fn database_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool
    pub async fn shutdown(self) {
        self.pool.close().await;
        info!("🛑 Harvester shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, HarvestError};
    use crate::search::InMemorySearchSource;

    #[tokio::test]
    async fn test_invalid_config_fails_before_connecting() {
        let mut config = HarvesterConfig::for_query("rust").with_batch_size(0);
        // Would fail to connect if reached
        config.database.url = "postgresql://nobody@127.0.0.1:1/none".to_string();

        let result = HarvesterSystem::bootstrap(config, Arc::new(InMemorySearchSource::default())).await;
        assert!(matches!(
            result,
            Err(HarvestError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
