//! Course creation and the `courseCount` bump.
//!
//! Creating a course is two sequential, independent store writes:
//!
//! 1. the course document, then
//! 2. a merge of `courseCount + 1` and `updatedAt` into the owning college.
//!
//! If (1) fails nothing was written. If (2) fails the course stays and the
//! counter under-counts by one; this is reported as
//! [`CatalogError::CounterStale`] and repaired by
//! [`crate::reconcile::CountReconciler`]. No rollback, no retry.

use std::sync::Arc;

use catalog_state::{timestamp_now, CatalogStore, CollegeId, CollegePatch, Course, CourseRecord};
use tracing::{debug, error, info, instrument, warn};

use crate::directory::CollegeDirectory;
use crate::error::{CatalogError, Result, ValidationError};
use crate::input::{required_name, NewCourseInput};

/// Validates and persists new courses, keeping the college counter in step.
#[derive(Clone)]
pub struct CourseCreator {
    store: Arc<dyn CatalogStore>,
}

impl CourseCreator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Create a course under `college_id`.
    ///
    /// `collegeName` is taken from the directory entry, or from the college
    /// this session created last when the entry is missing. The new counter
    /// value is the cached `courseCount` (0 if unknown) plus one; once the
    /// store accepts it the cached entry is updated to match, so repeated
    /// calls keep counting up.
    #[instrument(skip_all, fields(college_id = %college_id, name = %draft.name))]
    pub async fn create(
        &self,
        directory: &mut CollegeDirectory,
        college_id: &CollegeId,
        draft: NewCourseInput,
    ) -> Result<Course> {
        if college_id.is_blank() {
            return Err(ValidationError::NoCollegeSelected.into());
        }
        let name = required_name(&draft.name).ok_or(ValidationError::MissingCourseName)?;

        let cached = directory.find(college_id);
        let college_name = cached
            .map(|c| c.record.name.clone())
            .or_else(|| directory.last_created().map(|c| c.record.name.clone()))
            .unwrap_or_default();
        let current_count = cached.map(|c| c.record.course_count).unwrap_or(0);
        if cached.is_none() {
            warn!("College not in directory; counter will restart from zero");
        }

        let now = timestamp_now();
        let record = CourseRecord {
            name,
            college_id: college_id.0.clone(),
            college_name,
            duration: draft.duration,
            benefits: draft.benefits,
            eligibility: draft.eligibility,
            placement: draft.placement,
            created_at: now,
            updated_at: now,
        };

        let course = self.store.create_course(record).await.map_err(|e| {
            error!(error = %e, "Failed to create course");
            CatalogError::StoreWrite {
                what: "course",
                source: e,
            }
        })?;
        debug!(course_id = %course.id, "Course written");

        let patch = CollegePatch::course_count(current_count + 1);
        if let Err(e) = self.store.merge_college(college_id, patch.clone()).await {
            error!(
                course_id = %course.id,
                error = %e,
                "Course created but college counter was not updated"
            );
            return Err(CatalogError::CounterStale {
                course: Box::new(course),
                source: e,
            });
        }

        directory.apply_patch(college_id, &patch);
        info!(
            course_id = %course.id,
            course_count = patch.course_count,
            "Course created"
        );
        Ok(course)
    }
}
