//! SurrealDB Handle - connection setup
//!
//! Supports in-memory, local file (`surrealkv://`), arbitrary URL and cloud
//! (WebSocket) connections. Every constructor selects the namespace/database
//! and initialises the catalog tables before returning.

use std::path::Path;

use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{info, instrument};

use crate::config::{self, CatalogTables, CloudConfig, DEFAULT_DATABASE, DEFAULT_NAMESPACE};
use crate::error::StateError;
use crate::migrations;
use crate::Result;

/// SurrealDB connection handle for the catalog
#[derive(Clone)]
pub struct SurrealHandle {
    db: Surreal<Any>,
    tables: CatalogTables,
}

impl std::fmt::Debug for SurrealHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealHandle")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

impl SurrealHandle {
    /// Connect to SurrealDB in-memory and set up schema
    #[instrument(skip_all)]
    pub async fn setup_db() -> Result<Self> {
        Self::setup_db_with(CatalogTables::default()).await
    }

    /// In-memory connection using custom collection names
    #[instrument(skip_all)]
    pub async fn setup_db_with(tables: CatalogTables) -> Result<Self> {
        info!("Connecting to SurrealDB (in-memory)");
        Self::connect_url("mem://", DEFAULT_NAMESPACE, DEFAULT_DATABASE, tables).await
    }

    /// Connect to a local file-backed store, creating the directory if needed
    #[instrument(skip(tables), fields(path = %path.display()))]
    pub async fn setup_local(path: &Path, tables: CatalogTables) -> Result<Self> {
        tokio::fs::create_dir_all(path).await.map_err(|e| {
            StateError::Connection(format!(
                "Failed to create database directory {}: {}",
                path.display(),
                e
            ))
        })?;
        let url = format!("surrealkv://{}", path.display());
        info!("Using local persistence: {}", url);
        Self::connect_url(&url, DEFAULT_NAMESPACE, DEFAULT_DATABASE, tables).await
    }

    /// Connect to SurrealDB Cloud
    ///
    /// # Example
    /// ```ignore
    /// let config = CloudConfig::new(
    ///     "wss://xxx.aws-use1.surrealdb.cloud",
    ///     "your_username",
    ///     "your_password",
    /// );
    /// let handle = SurrealHandle::setup_cloud(config, CatalogTables::default()).await?;
    /// ```
    #[instrument(skip(config, tables), fields(endpoint = %config.endpoint, namespace = %config.namespace, database = %config.database))]
    pub async fn setup_cloud(config: CloudConfig, tables: CatalogTables) -> Result<Self> {
        info!("Connecting to SurrealDB Cloud (root={})", config.is_root);

        let db = surrealdb::engine::any::connect(&config.endpoint)
            .await
            .map_err(|e| {
                StateError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
            })?;

        if config.is_root {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| StateError::Connection(format!("Root authentication failed: {}", e)))?;
        } else {
            db.signin(Database {
                namespace: &config.namespace,
                database: &config.database,
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| {
                StateError::Connection(format!("Database authentication failed: {}", e))
            })?;
        }

        Self::finish(db, &config.namespace, &config.database, tables).await
    }

    /// Connect using environment variables
    ///
    /// If SURREALDB_ENDPOINT is set, connects to cloud.
    /// If SURREALDB_URL is set, connects to that URL.
    /// Otherwise, uses the local file store at CATALOG_DB_PATH (default `.catalog/db`).
    #[instrument(skip_all)]
    pub async fn setup_from_env() -> Result<Self> {
        let tables = CatalogTables::from_env()?;

        if let Ok(config) = CloudConfig::from_env() {
            info!("Cloud config found, connecting to SurrealDB Cloud");
            return Self::setup_cloud(config, tables).await;
        }

        if let Ok(url) = std::env::var("SURREALDB_URL") {
            info!("SURREALDB_URL found, connecting to {}", url);
            return Self::connect_url(&url, DEFAULT_NAMESPACE, DEFAULT_DATABASE, tables).await;
        }

        Self::setup_local(&config::local_db_path(), tables).await
    }

    async fn connect_url(
        url: &str,
        namespace: &str,
        database: &str,
        tables: CatalogTables,
    ) -> Result<Self> {
        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;
        Self::finish(db, namespace, database, tables).await
    }

    async fn finish(
        db: Surreal<Any>,
        namespace: &str,
        database: &str,
        tables: CatalogTables,
    ) -> Result<Self> {
        db.use_ns(namespace).use_db(database).await.map_err(|e| {
            StateError::Connection(format!("Failed to select namespace/database: {}", e))
        })?;

        migrations::init_schema(&db, &tables).await?;

        info!("SurrealDB connected and schema initialized");
        Ok(SurrealHandle { db, tables })
    }

    /// The underlying client
    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }

    /// Collection names in use
    pub fn tables(&self) -> &CatalogTables {
        &self.tables
    }
}
