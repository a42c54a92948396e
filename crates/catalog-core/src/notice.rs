//! User-facing outcome messages.
//!
//! Every workflow result ends up as one [`Notice`]; front ends only have to
//! render a level and a line of text.

use serde::Serialize;

use crate::error::{CatalogError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn college_created(name: &str) -> Self {
        Self::success(format!("College \"{name}\" created successfully!"))
    }

    pub fn course_created(name: &str) -> Self {
        Self::success(format!("Course \"{name}\" created successfully!"))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&CatalogError> for Notice {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Validation(v) => Notice::error(match v {
                ValidationError::MissingCollegeName => "Please enter a college name",
                ValidationError::NoCollegeSelected => "Please select or create a college",
                ValidationError::MissingCourseName => "Please enter a course name",
            }),
            CatalogError::StoreRead(_) => Notice::error("Failed to load colleges list"),
            CatalogError::StoreWrite { what: "college", .. } => {
                Notice::error("Failed to create college. Please try again.")
            }
            CatalogError::StoreWrite { source, .. } => {
                Notice::error(format!("Failed to create course. {source}"))
            }
            CatalogError::CounterStale { course, .. } => Notice::warning(format!(
                "Course \"{}\" created, but college record may be stale",
                course.record.name
            )),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}
