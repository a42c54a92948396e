//! Form drafts submitted by the user.
//!
//! Only the names are validated (non-empty after trimming). Every other field
//! is passed through exactly as entered.

use catalog_state::CollegeType;
use serde::{Deserialize, Serialize};

/// Draft of a new college
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollegeInput {
    pub name: String,
    pub affiliated_to: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub college_type: Option<CollegeType>,
    pub established_year: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

impl NewCollegeInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Draft of a new course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseInput {
    pub name: String,
    pub duration: Option<String>,
    pub benefits: Option<String>,
    pub eligibility: Option<String>,
    pub placement: Option<String>,
}

impl NewCourseInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// `Some(trimmed)` when the name has any non-whitespace content.
pub(crate) fn required_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_trims() {
        assert_eq!(required_name("  CS Eng \n").as_deref(), Some("CS Eng"));
        assert_eq!(required_name(""), None);
        assert_eq!(required_name(" \t\n "), None);
    }
}
