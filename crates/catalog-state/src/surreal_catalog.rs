//! SurrealDB-backed CatalogStore implementation
//!
//! Documents are addressed as `<table>:<key>`. Rows are read with their
//! record id and converted to `storage_traits` types at the boundary.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use surrealdb::sql::Thing;
use tracing::{debug, instrument, warn};

use crate::error::StorageError;
use crate::schema::{CollegePatch, CollegeRecord, CourseRecord};
use crate::storage_traits::{
    CatalogStore, College, CollegeId, Course, CourseId, StorageResult,
};
use crate::SurrealHandle;

#[derive(Debug, Deserialize)]
struct CollegeRow {
    id: Thing,
    #[serde(flatten)]
    record: CollegeRecord,
}

impl CollegeRow {
    fn into_college(self) -> College {
        College {
            id: CollegeId(self.id.id.to_raw()),
            record: self.record,
        }
    }
}

/// A college row decoded field by field, so one bad document does not hide the rest
#[derive(Debug, Deserialize)]
struct RawRow {
    id: Thing,
    #[serde(flatten)]
    doc: Map<String, Value>,
}

impl RawRow {
    fn into_college(self) -> Option<College> {
        let key = self.id.id.to_raw();
        match serde_json::from_value::<CollegeRecord>(Value::Object(self.doc)) {
            Ok(record) => Some(College {
                id: CollegeId(key),
                record,
            }),
            Err(e) => {
                warn!(college_id = %key, error = %e, "Skipping undecodable college document");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    id: Thing,
    #[serde(flatten)]
    record: CourseRecord,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            id: CourseId(self.id.id.to_raw()),
            record: self.record,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// SurrealDB-backed implementation of [`CatalogStore`].
#[derive(Clone, Debug)]
pub struct SurrealCatalog {
    handle: Arc<SurrealHandle>,
}

impl SurrealCatalog {
    pub fn new(handle: Arc<SurrealHandle>) -> Self {
        Self { handle }
    }

    /// Connect to a fresh in-memory database.
    pub async fn in_memory() -> crate::Result<Self> {
        Ok(Self::new(Arc::new(SurrealHandle::setup_db().await?)))
    }

    fn colleges(&self) -> String {
        self.handle.tables().colleges.clone()
    }

    fn courses(&self) -> String {
        self.handle.tables().courses.clone()
    }
}

#[async_trait]
impl CatalogStore for SurrealCatalog {
    #[instrument(skip(self))]
    async fn list_colleges(&self) -> StorageResult<Vec<College>> {
        let rows: Vec<RawRow> = self.handle.db().select(self.colleges()).await?;
        let total = rows.len();
        let colleges: Vec<College> = rows.into_iter().filter_map(RawRow::into_college).collect();
        if colleges.len() < total {
            warn!(skipped = total - colleges.len(), "Some college documents could not be read");
        }
        debug!(count = colleges.len(), "Listed colleges");
        Ok(colleges)
    }

    #[instrument(skip(self), fields(college_id = %id))]
    async fn get_college(&self, id: &CollegeId) -> StorageResult<Option<College>> {
        let row: Option<CollegeRow> = self
            .handle
            .db()
            .select((self.colleges(), id.0.clone()))
            .await?;
        Ok(row.map(CollegeRow::into_college))
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    async fn create_college(&self, record: CollegeRecord) -> StorageResult<College> {
        let id = CollegeId::generate();

        let created: Option<CollegeRow> = self
            .handle
            .db()
            .create((self.colleges(), id.0.clone()))
            .content(record)
            .await?;

        created
            .map(CollegeRow::into_college)
            .ok_or_else(|| StorageError::Backend("failed to create college record".to_string()))
    }

    #[instrument(skip(self, patch), fields(college_id = %id, course_count = patch.course_count))]
    async fn merge_college(&self, id: &CollegeId, patch: CollegePatch) -> StorageResult<()> {
        // UPDATE on a missing record id yields nothing rather than creating it.
        let updated: Option<CollegeRow> = self
            .handle
            .db()
            .update((self.colleges(), id.0.clone()))
            .merge(patch)
            .await?;

        match updated {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound {
                collection: self.colleges(),
                id: id.0.clone(),
            }),
        }
    }

    #[instrument(skip(self, record), fields(college_id = %record.college_id, name = %record.name))]
    async fn create_course(&self, record: CourseRecord) -> StorageResult<Course> {
        let id = CourseId::generate();

        let created: Option<CourseRow> = self
            .handle
            .db()
            .create((self.courses(), id.0.clone()))
            .content(record)
            .await?;

        created
            .map(CourseRow::into_course)
            .ok_or_else(|| StorageError::Backend("failed to create course record".to_string()))
    }

    #[instrument(skip(self))]
    async fn list_courses(&self, college_id: Option<&CollegeId>) -> StorageResult<Vec<Course>> {
        let db = self.handle.db();
        let rows: Vec<CourseRow> = match college_id {
            Some(cid) => {
                let mut res = db
                    .query("SELECT * FROM type::table($tb) WHERE collegeId = $cid")
                    .bind(("tb", self.courses()))
                    .bind(("cid", cid.0.clone()))
                    .await?;
                res.take(0)?
            }
            None => db.select(self.courses()).await?,
        };
        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    #[instrument(skip(self), fields(college_id = %college_id))]
    async fn count_courses(&self, college_id: &CollegeId) -> StorageResult<u64> {
        let mut res = self
            .handle
            .db()
            .query("SELECT count() AS total FROM type::table($tb) WHERE collegeId = $cid GROUP ALL")
            .bind(("tb", self.courses()))
            .bind(("cid", college_id.0.clone()))
            .await?;

        let rows: Vec<CountRow> = res.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
