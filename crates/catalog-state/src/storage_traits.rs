//! Storage trait definitions for the catalog
//!
//! `CatalogStore` is the document-store boundary used by the workflow. It is
//! async and backend-agnostic; an in-memory fake lives in the `fakes` module
//! and the SurrealDB implementation in `surreal_catalog`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::schema::{CollegePatch, CollegeRecord, CourseRecord};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Identity of a college document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollegeId(pub String);

impl CollegeId {
    /// Generate a fresh store identity
    pub fn generate() -> Self {
        CollegeId(new_document_key())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no college is bound (empty or whitespace).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for CollegeId {
    fn from(s: &str) -> Self {
        CollegeId(s.to_string())
    }
}

impl std::fmt::Display for CollegeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a course document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    /// Generate a fresh store identity
    pub fn generate() -> Self {
        CourseId(new_document_key())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hyphen-free so it can be used as a record key without escaping.
fn new_document_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A college document together with its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    pub id: CollegeId,
    #[serde(flatten)]
    pub record: CollegeRecord,
}

/// A course document together with its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(flatten)]
    pub record: CourseRecord,
}

/// Document store holding the `colleges` and `courses` collections.
///
/// Guarantees:
/// - `create_*` assigns a fresh identity; two calls never share one.
/// - `merge_college` writes only `courseCount` and `updatedAt`; every other
///   field of the stored document is left as it was.
/// - `merge_college` on a missing college fails with `StorageError::NotFound`
///   and creates nothing.
/// - Course creation and the counter merge are separate writes; no
///   implementation ties them together.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every college in the store, in the store's default order.
    async fn list_colleges(&self) -> StorageResult<Vec<College>>;

    /// A single college by identity.
    async fn get_college(&self, id: &CollegeId) -> StorageResult<Option<College>>;

    /// Persist a new college under a store-assigned identity.
    async fn create_college(&self, record: CollegeRecord) -> StorageResult<College>;

    /// Partially update an existing college's counter and timestamp.
    async fn merge_college(&self, id: &CollegeId, patch: CollegePatch) -> StorageResult<()>;

    /// Persist a new course under a store-assigned identity.
    async fn create_course(&self, record: CourseRecord) -> StorageResult<Course>;

    /// Courses, optionally restricted to one college.
    async fn list_courses(&self, college_id: Option<&CollegeId>) -> StorageResult<Vec<Course>>;

    /// Number of course documents referencing `college_id`.
    async fn count_courses(&self, college_id: &CollegeId) -> StorageResult<u64>;
}
