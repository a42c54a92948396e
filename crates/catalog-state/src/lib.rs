//! Catalog-State: document-store persistence for colleges and courses
//!
//! This crate owns every interaction with the document store. The workflow
//! crate talks to it only through the [`CatalogStore`] trait.
//!
//! ## Key Components
//!
//! - `CatalogStore`: async store boundary (create, select, merge, count)
//! - `SurrealHandle` / `SurrealCatalog`: SurrealDB connection and implementation
//! - `MemoryCatalogStore` (in `fakes`): in-memory store with failure injection
//! - `CollegeRecord` / `CourseRecord`: camelCase document shapes

pub mod config;
mod error;
pub mod fakes;
mod handle;
pub mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_catalog;

pub use config::{CatalogTables, CloudConfig};
pub use error::{StateError, StorageError};
pub use handle::SurrealHandle;
pub use schema::{timestamp_now, CollegePatch, CollegeRecord, CollegeType, CourseRecord};
pub use storage_traits::{
    CatalogStore, College, CollegeId, Course, CourseId, StorageResult,
};
pub use surreal_catalog::SurrealCatalog;

/// Result type for catalog-state setup operations
pub type Result<T> = std::result::Result<T, StateError>;
