//! In-memory fake for the storage trait (testing only)
//!
//! `MemoryCatalogStore` keeps every document as a JSON object, so a merge is a
//! real key-by-key merge and unknown fields survive it, the same way they do in
//! a schemaless document store. Individual operations can be forced to fail
//! with [`FailPoint`] to exercise the workflow's error paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StorageError;
use crate::schema::{CollegePatch, CollegeRecord, CourseRecord};
use crate::storage_traits::*;

const COLLEGES: &str = "colleges";

/// Operations of [`MemoryCatalogStore`] that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    ListColleges,
    CreateCollege,
    MergeCollege,
    CreateCourse,
}

impl FailPoint {
    fn as_str(&self) -> &'static str {
        match self {
            FailPoint::ListColleges => "list_colleges",
            FailPoint::CreateCollege => "create_college",
            FailPoint::MergeCollege => "merge_college",
            FailPoint::CreateCourse => "create_course",
        }
    }
}

#[derive(Debug, Default)]
struct Documents {
    // BTreeMap keeps listing order stable across calls.
    colleges: BTreeMap<String, Map<String, Value>>,
    courses: BTreeMap<String, Map<String, Value>>,
}

/// In-memory catalog store backed by JSON documents.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    docs: Mutex<Documents>,
    failing: Mutex<HashSet<FailPoint>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `point` fail until [`Self::recover`] is called.
    pub fn fail(&self, point: FailPoint) {
        self.failing.lock().unwrap().insert(point);
    }

    /// Stop failing `point`.
    pub fn recover(&self, point: FailPoint) {
        self.failing.lock().unwrap().remove(&point);
    }

    /// Seed a college under a known identity, as if written by another client.
    pub fn insert_college(&self, id: &CollegeId, record: &CollegeRecord) -> StorageResult<()> {
        let doc = to_object(record)?;
        self.docs
            .lock()
            .unwrap()
            .colleges
            .insert(id.0.clone(), doc);
        Ok(())
    }

    /// Raw stored college document, including fields the schema doesn't know.
    pub fn college_document(&self, id: &CollegeId) -> Option<Map<String, Value>> {
        self.docs.lock().unwrap().colleges.get(&id.0).cloned()
    }

    /// Seed a raw college document verbatim.
    pub fn insert_college_document(&self, id: &CollegeId, doc: Map<String, Value>) {
        self.docs
            .lock()
            .unwrap()
            .colleges
            .insert(id.0.clone(), doc);
    }

    /// Number of stored course documents, across all colleges.
    pub fn course_total(&self) -> usize {
        self.docs.lock().unwrap().courses.len()
    }

    fn check(&self, point: FailPoint) -> StorageResult<()> {
        if self.failing.lock().unwrap().contains(&point) {
            return Err(StorageError::Injected {
                operation: point.as_str().to_string(),
            });
        }
        Ok(())
    }
}

fn to_object<T: serde::Serialize>(value: &T) -> StorageResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn college_from(id: &str, doc: &Map<String, Value>) -> StorageResult<College> {
    let record: CollegeRecord = serde_json::from_value(Value::Object(doc.clone()))?;
    Ok(College {
        id: CollegeId(id.to_string()),
        record,
    })
}

fn course_from(id: &str, doc: &Map<String, Value>) -> StorageResult<Course> {
    let record: CourseRecord = serde_json::from_value(Value::Object(doc.clone()))?;
    Ok(Course {
        id: CourseId(id.to_string()),
        record,
    })
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_colleges(&self) -> StorageResult<Vec<College>> {
        self.check(FailPoint::ListColleges)?;
        let docs = self.docs.lock().unwrap();
        let colleges = docs
            .colleges
            .iter()
            .filter_map(|(id, doc)| match college_from(id, doc) {
                Ok(college) => Some(college),
                Err(e) => {
                    warn!(college_id = %id, error = %e, "Skipping undecodable college document");
                    None
                }
            })
            .collect();
        Ok(colleges)
    }

    async fn get_college(&self, id: &CollegeId) -> StorageResult<Option<College>> {
        let docs = self.docs.lock().unwrap();
        docs.colleges
            .get(&id.0)
            .map(|doc| college_from(&id.0, doc))
            .transpose()
    }

    async fn create_college(&self, record: CollegeRecord) -> StorageResult<College> {
        self.check(FailPoint::CreateCollege)?;
        let id = CollegeId::generate();
        let doc = to_object(&record)?;
        let college = college_from(&id.0, &doc)?;
        self.docs
            .lock()
            .unwrap()
            .colleges
            .insert(id.0.clone(), doc);
        Ok(college)
    }

    async fn merge_college(&self, id: &CollegeId, patch: CollegePatch) -> StorageResult<()> {
        self.check(FailPoint::MergeCollege)?;
        let fields = to_object(&patch)?;
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .colleges
            .get_mut(&id.0)
            .ok_or_else(|| StorageError::NotFound {
                collection: COLLEGES.to_string(),
                id: id.0.clone(),
            })?;
        doc.extend(fields);
        Ok(())
    }

    async fn create_course(&self, record: CourseRecord) -> StorageResult<Course> {
        self.check(FailPoint::CreateCourse)?;
        let id = CourseId::generate();
        let doc = to_object(&record)?;
        let course = course_from(&id.0, &doc)?;
        self.docs.lock().unwrap().courses.insert(id.0.clone(), doc);
        Ok(course)
    }

    async fn list_courses(&self, college_id: Option<&CollegeId>) -> StorageResult<Vec<Course>> {
        let docs = self.docs.lock().unwrap();
        let mut courses = Vec::new();
        for (id, doc) in &docs.courses {
            let course = course_from(id, doc)?;
            if college_id.map_or(true, |c| course.record.college_id == c.0) {
                courses.push(course);
            }
        }
        Ok(courses)
    }

    async fn count_courses(&self, college_id: &CollegeId) -> StorageResult<u64> {
        let docs = self.docs.lock().unwrap();
        let count = docs
            .courses
            .values()
            .filter(|doc| doc.get("collegeId").and_then(Value::as_str) == Some(college_id.as_str()))
            .count();
        Ok(count as u64)
    }
}
