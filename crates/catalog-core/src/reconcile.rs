//! Recompute `courseCount` from the course documents themselves.
//!
//! Repairs the under-count left behind by [`crate::CatalogError::CounterStale`]
//! and any drift caused by concurrent writers. Refresh the directory after
//! reconciling to see the corrected values.

use std::sync::Arc;

use catalog_state::{CatalogStore, CollegeId, CollegePatch, StorageError};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Outcome of reconciling one college
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub college_id: CollegeId,
    /// `courseCount` as stored before reconciling
    pub recorded: u64,
    /// Number of course documents found
    pub actual: u64,
}

impl Reconciliation {
    /// Whether the stored counter had to be rewritten.
    pub fn corrected(&self) -> bool {
        self.recorded != self.actual
    }
}

/// Rewrites drifted counters.
#[derive(Clone)]
pub struct CountReconciler {
    store: Arc<dyn CatalogStore>,
}

impl CountReconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Count the courses of one college and fix its counter if needed.
    #[instrument(skip(self), fields(college_id = %college_id))]
    pub async fn recount(&self, college_id: &CollegeId) -> Result<Reconciliation, StorageError> {
        let college = self
            .store
            .get_college(college_id)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                collection: "colleges".to_string(),
                id: college_id.0.clone(),
            })?;

        let actual = self.store.count_courses(college_id).await?;
        let outcome = Reconciliation {
            college_id: college_id.clone(),
            recorded: college.record.course_count,
            actual,
        };

        if outcome.corrected() {
            warn!(
                recorded = outcome.recorded,
                actual = outcome.actual,
                "Course count drifted; rewriting"
            );
            self.store
                .merge_college(college_id, CollegePatch::course_count(actual))
                .await?;
        }
        Ok(outcome)
    }

    /// Reconcile every college in the store.
    #[instrument(skip(self))]
    pub async fn recount_all(&self) -> Result<Vec<Reconciliation>, StorageError> {
        let colleges = self.store.list_colleges().await?;
        let mut outcomes = Vec::with_capacity(colleges.len());
        for college in &colleges {
            outcomes.push(self.recount(&college.id).await?);
        }
        let corrected = outcomes.iter().filter(|o| o.corrected()).count();
        info!(checked = outcomes.len(), corrected, "Reconciliation complete");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_state::fakes::MemoryCatalogStore;
    use catalog_state::{timestamp_now, CollegeRecord, CourseRecord};

    fn course_for(id: &CollegeId) -> CourseRecord {
        let now = timestamp_now();
        CourseRecord {
            name: "CS".to_string(),
            college_id: id.0.clone(),
            college_name: "XYZ".to_string(),
            duration: None,
            benefits: None,
            eligibility: None,
            placement: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn rewrites_under_count() {
        let store = Arc::new(MemoryCatalogStore::new());
        let id = CollegeId::from("c1");
        store.insert_college(&id, &CollegeRecord::new("XYZ")).unwrap();
        store.create_course(course_for(&id)).await.unwrap();
        store.create_course(course_for(&id)).await.unwrap();

        let outcome = CountReconciler::new(store.clone())
            .recount(&id)
            .await
            .unwrap();

        assert_eq!(outcome.recorded, 0);
        assert_eq!(outcome.actual, 2);
        assert!(outcome.corrected());
        let college = store.get_college(&id).await.unwrap().unwrap();
        assert_eq!(college.record.course_count, 2);
        assert_eq!(college.record.name, "XYZ");
    }

    #[tokio::test]
    async fn consistent_counter_is_left_alone() {
        let store = Arc::new(MemoryCatalogStore::new());
        let id = CollegeId::from("c1");
        let record = CollegeRecord::new("XYZ");
        let before = record.updated_at;
        store.insert_college(&id, &record).unwrap();

        let outcomes = CountReconciler::new(store.clone())
            .recount_all()
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].corrected());
        let college = store.get_college(&id).await.unwrap().unwrap();
        assert_eq!(college.record.updated_at, before);
    }

    #[tokio::test]
    async fn missing_college_is_not_found() {
        let store = Arc::new(MemoryCatalogStore::new());
        let err = CountReconciler::new(store)
            .recount(&CollegeId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
