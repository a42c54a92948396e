//! Document shapes for the `colleges` and `courses` collections
//!
//! Field names are camelCase on the wire and timestamps are ISO-8601 text,
//! matching documents written by earlier clients of the same collections.
//!
//! - [`CollegeRecord`]: a college document body (identity lives on the document key)
//! - [`CourseRecord`]: a course document body
//! - [`CollegePatch`]: the partial write used to bump `courseCount`

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Current time at the precision documents store (milliseconds).
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Serializes chrono timestamps as ISO-8601 text with millisecond precision
pub(crate) mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn format(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Reads the college `type` field leniently: blank or unknown values are unset
mod college_type_opt {
    use super::CollegeType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<CollegeType>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(kind) => serializer.serialize_str(kind.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CollegeType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| match s.trim() {
            "" => None,
            other => {
                let parsed = CollegeType::parse(other);
                if parsed.is_none() {
                    tracing::warn!(value = other, "ignoring unknown college type");
                }
                parsed
            }
        }))
    }
}

/// Kind of institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollegeType {
    /// Deemed to be University
    Deemed,
    Autonomous,
}

impl CollegeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollegeType::Deemed => "Deemed",
            CollegeType::Autonomous => "Autonomous",
        }
    }

    /// Parse the stored form, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("deemed") {
            Some(CollegeType::Deemed)
        } else if s.eq_ignore_ascii_case("autonomous") {
            Some(CollegeType::Autonomous)
        } else {
            None
        }
    }
}

impl std::fmt::Display for CollegeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// College document stored in the `colleges` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCollege")]
pub struct CollegeRecord {
    pub name: String,
    /// University or board the college is affiliated to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliated_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        rename = "type",
        default,
        with = "college_type_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub college_type: Option<CollegeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Denormalized number of courses referencing this college
    #[serde(default)]
    pub course_count: u64,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl CollegeRecord {
    /// A fresh college with no courses, created and updated now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = timestamp_now();
        CollegeRecord {
            name: name.into(),
            affiliated_to: None,
            district: None,
            state: None,
            college_type: None,
            established_year: None,
            website: None,
            description: None,
            course_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read side of [`CollegeRecord`].
///
/// Earlier clients wrote the affiliation as `affliatedTo`; some documents
/// carry both spellings. `affiliatedTo` wins when present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCollege {
    name: String,
    #[serde(default)]
    affiliated_to: Option<String>,
    #[serde(default, rename = "affliatedTo")]
    legacy_affiliated_to: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(rename = "type", default, with = "college_type_opt")]
    college_type: Option<CollegeType>,
    #[serde(default)]
    established_year: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    course_count: u64,
    #[serde(with = "iso_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(with = "iso_timestamp")]
    updated_at: DateTime<Utc>,
}

impl From<StoredCollege> for CollegeRecord {
    fn from(stored: StoredCollege) -> Self {
        CollegeRecord {
            name: stored.name,
            affiliated_to: stored.affiliated_to.or(stored.legacy_affiliated_to),
            district: stored.district,
            state: stored.state,
            college_type: stored.college_type,
            established_year: stored.established_year,
            website: stored.website,
            description: stored.description,
            course_count: stored.course_count,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Course document stored in the `courses` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub name: String,
    pub college_id: String,
    /// Name of the college when the course was created; never re-synced
    #[serde(default)]
    pub college_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Partial college write: only these two fields are touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegePatch {
    pub course_count: u64,
    #[serde(with = "iso_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl CollegePatch {
    pub fn course_count(course_count: u64) -> Self {
        CollegePatch {
            course_count,
            updated_at: timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn college_uses_camel_case_wire_names() {
        let mut college = CollegeRecord::new("ABC Institute");
        college.affiliated_to = Some("State University".to_string());
        college.college_type = Some(CollegeType::Autonomous);

        let value = serde_json::to_value(&college).unwrap();
        assert_eq!(value["name"], "ABC Institute");
        assert_eq!(value["affiliatedTo"], "State University");
        assert_eq!(value["type"], "Autonomous");
        assert_eq!(value["courseCount"], 0);
        assert!(value.get("district").is_none());
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn timestamps_are_iso_text_with_millis() {
        let college = CollegeRecord::new("X");
        let value = serde_json::to_value(&college).unwrap();
        let created = value["createdAt"].as_str().unwrap();
        // 2026-10-19T08:15:30.123Z
        assert_eq!(created.len(), 24);
        assert_eq!(created, value["updatedAt"].as_str().unwrap());
    }

    #[test]
    fn reads_documents_from_earlier_clients() {
        let value = json!({
            "name": "XYZ",
            "affliatedTo": "Old Board",
            "district": "",
            "type": "",
            "establishedYear": "1995",
            "courseCount": 5,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z"
        });

        let college: CollegeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(college.affiliated_to.as_deref(), Some("Old Board"));
        assert_eq!(college.district.as_deref(), Some(""));
        assert_eq!(college.college_type, None);
        assert_eq!(college.course_count, 5);
    }

    #[test]
    fn both_affiliation_spellings_prefer_the_current_one() {
        let value = json!({
            "name": "XYZ",
            "affliatedTo": "Old Board",
            "affiliatedTo": "Calicut University",
            "courseCount": 5,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z"
        });

        let college: CollegeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(college.affiliated_to.as_deref(), Some("Calicut University"));
        assert_eq!(college.course_count, 5);

        let written = serde_json::to_value(&college).unwrap();
        assert!(written.get("affliatedTo").is_none());
    }

    #[test]
    fn unknown_college_type_reads_as_unset() {
        let value = json!({
            "name": "XYZ",
            "type": "Private",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z"
        });

        let college: CollegeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(college.college_type, None);
        assert_eq!(college.course_count, 0);
    }

    #[test]
    fn patch_only_carries_counter_and_timestamp() {
        let patch = CollegePatch::course_count(6);
        let value = serde_json::to_value(&patch).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(value["courseCount"], 6);
    }
}
