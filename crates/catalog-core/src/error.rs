//! Error taxonomy for the catalog workflow.

use catalog_state::{Course, StorageError};

/// A required field was missing; raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing college name")]
    MissingCollegeName,

    #[error("no college selected")]
    NoCollegeSelected,

    #[error("missing course name")]
    MissingCourseName,
}

/// Catalog workflow errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Loading the college directory failed.
    #[error("failed to load colleges: {0}")]
    StoreRead(#[source] StorageError),

    /// Creating a college or course failed; nothing was written.
    #[error("failed to write {what}: {source}")]
    StoreWrite {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    /// The course was written but the owning college's `courseCount` was not
    /// incremented. The course is kept; the counter under-counts by one until
    /// it is reconciled.
    #[error("course {} created, but college record may be stale: {source}", .course.id)]
    CounterStale {
        course: Box<Course>,
        #[source]
        source: StorageError,
    },
}

impl CatalogError {
    /// The course that exists despite the error, if any.
    pub fn created_course(&self) -> Option<&Course> {
        match self {
            CatalogError::CounterStale { course, .. } => Some(course),
            _ => None,
        }
    }
}

/// Result type for catalog workflow operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
