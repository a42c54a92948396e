//! College creation.

use std::sync::Arc;

use catalog_state::{timestamp_now, CatalogStore, College, CollegeRecord};
use tracing::{error, info, instrument};

use crate::directory::CollegeDirectory;
use crate::error::{CatalogError, Result, ValidationError};
use crate::input::{required_name, NewCollegeInput};

/// Validates and persists new colleges.
#[derive(Clone)]
pub struct CollegeCreator {
    store: Arc<dyn CatalogStore>,
}

impl CollegeCreator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Persist `draft` as a new college and append it to `directory`.
    ///
    /// The name is trimmed; all other fields are stored as given. The new
    /// college starts with `courseCount = 0` and `createdAt == updatedAt`.
    /// On failure the directory is left untouched.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create(
        &self,
        directory: &mut CollegeDirectory,
        draft: NewCollegeInput,
    ) -> Result<College> {
        let name = required_name(&draft.name).ok_or(ValidationError::MissingCollegeName)?;

        let now = timestamp_now();
        let record = CollegeRecord {
            name,
            affiliated_to: draft.affiliated_to,
            district: draft.district,
            state: draft.state,
            college_type: draft.college_type,
            established_year: draft.established_year,
            website: draft.website,
            description: draft.description,
            course_count: 0,
            created_at: now,
            updated_at: now,
        };

        let college = self.store.create_college(record).await.map_err(|e| {
            error!(error = %e, "Failed to create college");
            CatalogError::StoreWrite {
                what: "college",
                source: e,
            }
        })?;

        info!(college_id = %college.id, "College created");
        directory.push(college.clone());
        Ok(college)
    }
}
