//! End-to-end workflow tests against the in-memory store.
//!
//! Covers blank-name rejection, fresh-college defaults, course creation,
//! the counter-update failure window, non-idempotence and the two
//! reference scenarios (empty directory, pre-existing college).

use std::sync::Arc;

use catalog_core::{
    CatalogError, CatalogSession, CollegeCreator, CollegeDirectory, CourseCreator,
    CountReconciler, FormMode, NewCollegeInput, NewCourseInput, NoticeLevel, ValidationError,
};
use catalog_state::fakes::{FailPoint, MemoryCatalogStore};
use catalog_state::{CatalogStore, CollegeId, CollegeRecord, CollegeType};

fn seeded_xyz() -> (Arc<MemoryCatalogStore>, CollegeId) {
    let store = Arc::new(MemoryCatalogStore::new());
    let id = CollegeId::from("c1");
    let mut record = CollegeRecord::new("XYZ");
    record.affiliated_to = Some("Calicut University".to_string());
    record.district = Some("Thrissur".to_string());
    record.college_type = Some(CollegeType::Autonomous);
    record.description = Some("Est. campus".to_string());
    record.course_count = 5;
    store.insert_college(&id, &record).unwrap();
    (store, id)
}

async fn loaded(store: &Arc<MemoryCatalogStore>) -> CollegeDirectory {
    let mut directory = CollegeDirectory::new(store.clone());
    directory.load().await.unwrap();
    directory
}

// ---------------------------------------------------------------------------
// Blank names
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_names_always_fail_validation() {
    let (store, id) = seeded_xyz();
    let mut directory = loaded(&store).await;
    let colleges = CollegeCreator::new(store.clone());
    let courses = CourseCreator::new(store.clone());

    for blank in ["", " ", "\n\t  "] {
        let full_college = NewCollegeInput {
            name: blank.to_string(),
            affiliated_to: Some("Board".to_string()),
            website: Some("https://x.edu".to_string()),
            ..NewCollegeInput::default()
        };
        let err = colleges.create(&mut directory, full_college).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::MissingCollegeName)
        ));

        let full_course = NewCourseInput {
            name: blank.to_string(),
            duration: Some("4 years".to_string()),
            placement: Some("90%".to_string()),
            ..NewCourseInput::default()
        };
        let err = courses
            .create(&mut directory, &id, full_course)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::MissingCourseName)
        ));
    }

    assert_eq!(store.list_colleges().await.unwrap().len(), 1);
    assert_eq!(store.course_total(), 0);
}

// ---------------------------------------------------------------------------
// Fresh college defaults
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_college_has_zero_count_and_matching_timestamps() {
    let store = Arc::new(MemoryCatalogStore::new());
    let mut directory = loaded(&store).await;

    let college = CollegeCreator::new(store.clone())
        .create(&mut directory, NewCollegeInput::named("ABC Institute"))
        .await
        .unwrap();

    assert_eq!(college.record.course_count, 0);
    assert_eq!(college.record.created_at, college.record.updated_at);

    let stored = store.get_college(&college.id).await.unwrap().unwrap();
    assert_eq!(stored.record, college.record);
}

// ---------------------------------------------------------------------------
// Course creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn course_is_written_once_with_trimmed_name_and_verbatim_details() {
    let (store, id) = seeded_xyz();
    let mut directory = loaded(&store).await;

    let draft = NewCourseInput {
        name: "  CS Eng  ".to_string(),
        duration: Some(" 4 years ".to_string()),
        benefits: Some("Industry tie-ups".to_string()),
        eligibility: Some("Plus two with maths".to_string()),
        placement: None,
    };
    let course = CourseCreator::new(store.clone())
        .create(&mut directory, &id, draft)
        .await
        .unwrap();

    let stored = store.list_courses(Some(&id)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, course.id);

    let record = &stored[0].record;
    assert_eq!(record.name, "CS Eng");
    assert_eq!(record.college_id, "c1");
    assert_eq!(record.college_name, "XYZ");
    assert_eq!(record.duration.as_deref(), Some(" 4 years "));
    assert_eq!(record.benefits.as_deref(), Some("Industry tie-ups"));
    assert_eq!(record.eligibility.as_deref(), Some("Plus two with maths"));
    assert_eq!(record.placement, None);
    assert_eq!(record.created_at, record.updated_at);
}

// ---------------------------------------------------------------------------
// Counter-update failure window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn counter_failure_keeps_course_and_leaves_count_unchanged() {
    let (store, id) = seeded_xyz();
    let mut directory = loaded(&store).await;
    store.fail(FailPoint::MergeCollege);

    let err = CourseCreator::new(store.clone())
        .create(&mut directory, &id, NewCourseInput::named("CS Eng"))
        .await
        .unwrap_err();

    let course = match &err {
        CatalogError::CounterStale { course, .. } => course.clone(),
        other => panic!("expected CounterStale, got {other:?}"),
    };
    assert!(err.to_string().contains("may be stale"));

    let stored = store.list_courses(Some(&id)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], *course);

    let college = store.get_college(&id).await.unwrap().unwrap();
    assert_eq!(college.record.course_count, 5);
    assert_eq!(directory.find(&id).unwrap().record.course_count, 5);
}

#[tokio::test]
async fn reconciler_repairs_the_counter_after_a_failed_update() {
    let (store, id) = seeded_xyz();
    let mut directory = loaded(&store).await;
    let courses = CourseCreator::new(store.clone());

    // Five courses the counter claims exist, written by another client.
    for n in 0..5 {
        let mut dir = loaded(&store).await;
        store.fail(FailPoint::MergeCollege);
        courses
            .create(&mut dir, &id, NewCourseInput::named(format!("Old {n}")))
            .await
            .unwrap_err();
        store.recover(FailPoint::MergeCollege);
    }
    store.fail(FailPoint::MergeCollege);
    courses
        .create(&mut directory, &id, NewCourseInput::named("CS Eng"))
        .await
        .unwrap_err();
    store.recover(FailPoint::MergeCollege);

    let outcome = CountReconciler::new(store.clone())
        .recount(&id)
        .await
        .unwrap();
    assert_eq!(outcome.recorded, 5);
    assert_eq!(outcome.actual, 6);

    directory.refresh().await.unwrap();
    assert_eq!(directory.find(&id).unwrap().record.course_count, 6);
}

// ---------------------------------------------------------------------------
// Non-idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeating_a_submission_creates_two_courses_and_counts_twice() {
    let (store, id) = seeded_xyz();
    let mut directory = loaded(&store).await;
    let courses = CourseCreator::new(store.clone());

    let first = courses
        .create(&mut directory, &id, NewCourseInput::named("CS Eng"))
        .await
        .unwrap();
    let second = courses
        .create(&mut directory, &id, NewCourseInput::named("CS Eng"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(store.count_courses(&id).await.unwrap(), 2);
    let college = store.get_college(&id).await.unwrap().unwrap();
    assert_eq!(college.record.course_count, 7);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_empty_directory_then_create_college_and_course() {
    let store = Arc::new(MemoryCatalogStore::new());
    let mut session = CatalogSession::new(store.clone());

    assert!(session.open().await.is_none());
    assert!(session.directory().is_empty());

    session.begin_new_college();
    assert_eq!(session.mode(), FormMode::Creating);
    let submission = session
        .submit_college(NewCollegeInput::named("ABC Institute"))
        .await;
    assert_eq!(submission.notice.level, NoticeLevel::Success);
    assert_eq!(
        submission.notice.message,
        "College \"ABC Institute\" created successfully!"
    );
    let college = submission.created.unwrap();
    assert_eq!(college.record.course_count, 0);

    let submission = session.submit_course(NewCourseInput::named("CS Eng")).await;
    assert_eq!(submission.notice.level, NoticeLevel::Success);
    let course = submission.created.unwrap();
    assert_eq!(course.record.college_name, "ABC Institute");
    assert_eq!(course.record.college_id, college.id.0);

    let stored = store.get_college(&college.id).await.unwrap().unwrap();
    assert_eq!(stored.record.course_count, 1);
    assert_eq!(session.selected(), Some(&college.id));
}

#[tokio::test]
async fn scenario_existing_college_is_merged_not_overwritten() {
    let (store, id) = seeded_xyz();
    let before = store.get_college(&id).await.unwrap().unwrap();
    let mut legacy = store.college_document(&id).unwrap();
    legacy.insert("affliatedTo".to_string(), serde_json::json!("Old spelling"));
    store.insert_college_document(&id, legacy);

    let mut session = CatalogSession::new(store.clone());
    assert!(session.open().await.is_none());
    assert_eq!(
        session.selected_college().map(|c| c.record.course_count),
        None
    );
    session.select(id.clone());
    assert_eq!(session.selected_college().unwrap().record.course_count, 5);

    let submission = session.submit_course(NewCourseInput::named("MBA")).await;
    assert_eq!(submission.notice.level, NoticeLevel::Success);

    let after = store.get_college(&id).await.unwrap().unwrap();
    assert_eq!(after.record.course_count, 6);
    assert_eq!(after.record.name, before.record.name);
    assert_eq!(after.record.district, before.record.district);
    assert_eq!(after.record.college_type, before.record.college_type);
    assert_eq!(after.record.description, before.record.description);
    assert_eq!(after.record.created_at, before.record.created_at);

    let raw = store.college_document(&id).unwrap();
    assert_eq!(raw["affliatedTo"], "Old spelling");
    assert_eq!(raw["affiliatedTo"], "Calicut University");
}

#[tokio::test]
async fn scenario_counter_failure_surfaces_as_warning() {
    let (store, id) = seeded_xyz();
    let mut session = CatalogSession::new(store.clone());
    session.open().await;
    session.select(id.clone());
    store.fail(FailPoint::MergeCollege);

    let submission = session.submit_course(NewCourseInput::named("MBA")).await;

    assert_eq!(submission.notice.level, NoticeLevel::Warning);
    assert_eq!(
        submission.notice.message,
        "Course \"MBA\" created, but college record may be stale"
    );
    assert!(submission.created.is_some());
}

#[tokio::test]
async fn unreadable_college_does_not_hide_the_rest_of_the_directory() {
    let (store, id) = seeded_xyz();
    let stub = serde_json::json!({ "courseCount": 2, "updatedAt": "2024-03-02T10:00:00.000Z" });
    store.insert_college_document(&CollegeId::from("stub"), stub.as_object().cloned().unwrap());

    let mut session = CatalogSession::new(store.clone());
    assert!(session.open().await.is_none());
    assert_eq!(session.directory().colleges().len(), 1);
    assert!(session.directory().find(&CollegeId::from("stub")).is_none());

    session.select(id.clone());
    let submission = session.submit_course(NewCourseInput::named("MBA")).await;
    assert_eq!(submission.notice.level, NoticeLevel::Success);

    let college = store.get_college(&id).await.unwrap().unwrap();
    assert_eq!(college.record.course_count, 6);
}
