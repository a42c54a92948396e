//! Connection and collection configuration, read from the environment

use std::path::PathBuf;

use crate::error::StateError;

/// Default namespace for catalog data
pub const DEFAULT_NAMESPACE: &str = "catalog";
/// Default database within the namespace
pub const DEFAULT_DATABASE: &str = "main";
/// Default directory for the local file-backed store
pub const DEFAULT_DB_PATH: &str = ".catalog/db";

/// Configuration for SurrealDB Cloud connection
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// WebSocket endpoint URL (e.g., "wss://xxx.aws-use1.surrealdb.cloud")
    pub endpoint: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Namespace (default: "catalog")
    pub namespace: String,
    /// Database name (default: "main")
    pub database: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

impl CloudConfig {
    /// Create a new cloud configuration for a database user
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            is_root: false,
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Set whether this is a root user
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT (required)
    /// - SURREALDB_USERNAME (required)
    /// - SURREALDB_PASSWORD (required)
    /// - SURREALDB_NAMESPACE (optional, default: "catalog")
    /// - SURREALDB_DATABASE (optional, default: "main")
    /// - SURREALDB_ROOT (optional, default: "false")
    pub fn from_env() -> Result<Self, StateError> {
        let required = |key: &str| {
            std::env::var(key).map_err(|_| StateError::Config(format!("{key} not set")))
        };
        let endpoint = required("SURREALDB_ENDPOINT")?;
        let username = required("SURREALDB_USERNAME")?;
        let password = required("SURREALDB_PASSWORD")?;
        let namespace =
            std::env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let database =
            std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let is_root = std::env::var("SURREALDB_ROOT")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            username,
            password,
            namespace,
            database,
            is_root,
        })
    }
}

/// Names of the two collections the catalog writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTables {
    pub colleges: String,
    pub courses: String,
}

impl Default for CatalogTables {
    fn default() -> Self {
        Self {
            colleges: "colleges".to_string(),
            courses: "courses".to_string(),
        }
    }
}

impl CatalogTables {
    /// Build and validate a pair of collection names.
    pub fn new(colleges: impl Into<String>, courses: impl Into<String>) -> Result<Self, StateError> {
        let tables = Self {
            colleges: colleges.into(),
            courses: courses.into(),
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Read `CATALOG_COLLEGES_TABLE` / `CATALOG_COURSES_TABLE`, falling back to
    /// `colleges` / `courses`.
    pub fn from_env() -> Result<Self, StateError> {
        let defaults = Self::default();
        Self::new(
            std::env::var("CATALOG_COLLEGES_TABLE").unwrap_or(defaults.colleges),
            std::env::var("CATALOG_COURSES_TABLE").unwrap_or(defaults.courses),
        )
    }

    /// Names are interpolated into table definitions, so only
    /// `[A-Za-z0-9_-]` is accepted.
    pub fn validate(&self) -> Result<(), StateError> {
        for name in [&self.colleges, &self.courses] {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(StateError::Config(format!("invalid table name: {name:?}")));
            }
        }
        if self.colleges == self.courses {
            return Err(StateError::Config(
                "colleges and courses must use different tables".to_string(),
            ));
        }
        Ok(())
    }
}

/// Directory for the local file-backed store (`CATALOG_DB_PATH`, default `.catalog/db`)
pub fn local_db_path() -> PathBuf {
    std::env::var("CATALOG_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}
