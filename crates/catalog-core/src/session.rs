//! One visit to the "add course" form.
//!
//! The session owns the college directory, tracks whether the user is picking
//! an existing college or filling in a new one, and remembers which college is
//! bound. Every operation returns a [`Notice`]; errors never escape.

use std::sync::Arc;

use catalog_state::{CatalogStore, College, CollegeId, Course};
use tracing::{debug, instrument};

use crate::college::CollegeCreator;
use crate::course::CourseCreator;
use crate::directory::CollegeDirectory;
use crate::error::CatalogError;
use crate::input::{NewCollegeInput, NewCourseInput};
use crate::notice::Notice;

/// What the college part of the form is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Picking from the directory
    #[default]
    Selecting,
    /// Filling in a new college
    Creating,
}

/// Result of a submission: the notice to show plus what was created, if anything
#[derive(Debug)]
pub struct Submission<T> {
    pub notice: Notice,
    pub created: Option<T>,
}

impl<T> Submission<T> {
    fn ok(notice: Notice, created: T) -> Self {
        Self {
            notice,
            created: Some(created),
        }
    }

    fn failed(err: &CatalogError) -> Self {
        Self {
            notice: Notice::from(err),
            created: None,
        }
    }
}

pub struct CatalogSession {
    directory: CollegeDirectory,
    colleges: CollegeCreator,
    courses: CourseCreator,
    mode: FormMode,
    selected: Option<CollegeId>,
}

impl CatalogSession {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            directory: CollegeDirectory::new(store.clone()),
            colleges: CollegeCreator::new(store.clone()),
            courses: CourseCreator::new(store),
            mode: FormMode::Selecting,
            selected: None,
        }
    }

    /// Load the directory. Returns a notice only when loading failed.
    #[instrument(skip(self))]
    pub async fn open(&mut self) -> Option<Notice> {
        match self.directory.load().await {
            Ok(colleges) => {
                debug!(count = colleges.len(), "Session opened");
                None
            }
            Err(e) => Some(Notice::from(&e)),
        }
    }

    /// Reload the directory, keeping the current selection.
    pub async fn refresh(&mut self) -> Option<Notice> {
        self.directory.refresh().await.err().map(|e| Notice::from(&e))
    }

    pub fn directory(&self) -> &CollegeDirectory {
        &self.directory
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&CollegeId> {
        self.selected.as_ref()
    }

    /// The bound college, if it is in the directory.
    pub fn selected_college(&self) -> Option<&College> {
        self.selected.as_ref().and_then(|id| self.directory.find(id))
    }

    /// Bind an existing college. A blank id clears the selection.
    pub fn select(&mut self, id: CollegeId) {
        self.mode = FormMode::Selecting;
        self.selected = (!id.is_blank()).then_some(id);
    }

    pub fn begin_new_college(&mut self) {
        self.mode = FormMode::Creating;
    }

    pub fn cancel_new_college(&mut self) {
        self.mode = FormMode::Selecting;
    }

    /// Create a college; on success it becomes the selection.
    #[instrument(skip_all)]
    pub async fn submit_college(&mut self, draft: NewCollegeInput) -> Submission<College> {
        match self.colleges.create(&mut self.directory, draft).await {
            Ok(college) => {
                self.selected = Some(college.id.clone());
                self.mode = FormMode::Selecting;
                Submission::ok(Notice::college_created(&college.record.name), college)
            }
            Err(e) => Submission::failed(&e),
        }
    }

    /// Create a course under the selected college; the selection is kept.
    ///
    /// When only the counter update failed, the created course is still
    /// returned alongside a warning.
    #[instrument(skip_all)]
    pub async fn submit_course(&mut self, draft: NewCourseInput) -> Submission<Course> {
        let college_id = self.selected.clone().unwrap_or_else(|| CollegeId(String::new()));
        match self
            .courses
            .create(&mut self.directory, &college_id, draft)
            .await
        {
            Ok(course) => Submission::ok(Notice::course_created(&course.record.name), course),
            Err(e) => Submission {
                notice: Notice::from(&e),
                created: e.created_course().cloned(),
            },
        }
    }
}
