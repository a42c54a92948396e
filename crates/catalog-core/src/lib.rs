//! Catalog Core Library
//!
//! The create/select-or-create workflow for colleges and courses:
//!
//! - [`CollegeDirectory`]: session-owned cache of every college
//! - [`CollegeCreator`]: validates and writes a new college
//! - [`CourseCreator`]: writes a course, then bumps its college's `courseCount`
//! - [`CountReconciler`]: recomputes counters from the course documents
//! - [`CatalogSession`]: form driver with an explicit [`FormMode`]

pub mod college;
pub mod course;
pub mod directory;
pub mod error;
pub mod input;
pub mod notice;
pub mod reconcile;
pub mod session;
pub mod telemetry;

pub use college::CollegeCreator;
pub use course::CourseCreator;
pub use directory::{CollegeDirectory, DirectoryState};
pub use error::{CatalogError, Result, ValidationError};
pub use input::{NewCollegeInput, NewCourseInput};
pub use notice::{Notice, NoticeLevel};
pub use reconcile::{CountReconciler, Reconciliation};
pub use session::{CatalogSession, FormMode, Submission};
pub use telemetry::init_tracing;

pub use catalog_state::{
    CatalogStore, College, CollegeId, CollegeRecord, CollegeType, Course, CourseId, CourseRecord,
};
