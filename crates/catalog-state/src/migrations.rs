//! Collection initialisation
//!
//! Defines the two catalog tables and the lookup index on `courses.collegeId`.
//! Existing documents are never rewritten. Safe to call on every connect.

use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::config::CatalogTables;
use crate::error::StateError;
use crate::Result;

/// Initialize the catalog tables in SurrealDB
pub async fn init_schema(db: &Surreal<Any>, tables: &CatalogTables) -> Result<()> {
    tables.validate()?;
    info!(colleges = %tables.colleges, courses = %tables.courses, "Initializing catalog schema");

    init_colleges_table(db, &tables.colleges).await?;
    init_courses_table(db, &tables.courses).await?;

    info!("Catalog schema initialization complete");
    Ok(())
}

/// Initialize the colleges table
///
/// Schema (schemaless, camelCase fields):
/// ```text
/// TABLE colleges {
///   name:            STRING
///   affiliatedTo:    STRING?
///   district:        STRING?
///   state:           STRING?
///   type:            STRING?  (Deemed | Autonomous)
///   establishedYear: STRING?
///   website:         STRING?
///   description:     STRING?
///   courseCount:     INT
///   createdAt:       STRING (ISO-8601)
///   updatedAt:       STRING (ISO-8601)
/// }
/// ```
async fn init_colleges_table(db: &Surreal<Any>, table: &str) -> Result<()> {
    debug!("Initializing {} table", table);

    let sql = format!(
        r#"
        DEFINE TABLE IF NOT EXISTS `{table}` SCHEMALESS
            PERMISSIONS
                FOR select FULL
                FOR create FULL
                FOR update FULL
                FOR delete NONE;
        "#
    );

    db.query(sql)
        .await
        .and_then(|res| res.check())
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;
    Ok(())
}

/// Initialize the courses table
///
/// Schema:
/// ```text
/// TABLE courses {
///   name:        STRING
///   collegeId:   STRING (indexed, references colleges)
///   collegeName: STRING
///   duration:    STRING?
///   benefits:    STRING?
///   eligibility: STRING?
///   placement:   STRING?
///   createdAt:   STRING (ISO-8601)
///   updatedAt:   STRING (ISO-8601)
/// }
/// ```
async fn init_courses_table(db: &Surreal<Any>, table: &str) -> Result<()> {
    debug!("Initializing {} table", table);

    let sql = format!(
        r#"
        DEFINE TABLE IF NOT EXISTS `{table}` SCHEMALESS
            PERMISSIONS
                FOR select FULL
                FOR create FULL
                FOR update NONE
                FOR delete NONE;

        DEFINE INDEX IF NOT EXISTS idx_course_college ON TABLE `{table}` COLUMNS collegeId;
        "#
    );

    db.query(sql)
        .await
        .and_then(|res| res.check())
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;
    Ok(())
}
