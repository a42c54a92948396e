//! Catalog CLI
//!
//! The `catalog` command drives the college/course workflow against the
//! configured SurrealDB store.
//!
//! ## Commands
//!
//! - `colleges`: List every college with its course count
//! - `add-college`: Create a college
//! - `add-course`: Create a course under an existing college
//! - `courses`: List courses, optionally for one college
//! - `reconcile`: Recompute `courseCount` from the stored courses

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use catalog_core::{
    CatalogSession, CatalogStore, CollegeId, CollegeType, CountReconciler, NewCollegeInput,
    NewCourseInput, Notice,
};
use catalog_state::{SurrealCatalog, SurrealHandle};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage colleges and their courses", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all colleges
    Colleges,

    /// Create a new college
    AddCollege {
        /// College name (required)
        #[arg(short, long)]
        name: String,

        /// Affiliating university or board
        #[arg(long)]
        affiliated_to: Option<String>,

        #[arg(long)]
        district: Option<String>,

        #[arg(long)]
        state: Option<String>,

        /// Institution type
        #[arg(long = "type", value_enum)]
        college_type: Option<TypeArg>,

        #[arg(long)]
        established_year: Option<String>,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Create a course under an existing college
    AddCourse {
        /// Id of the owning college (see `catalog colleges`)
        #[arg(short, long)]
        college: String,

        /// Course name (required)
        #[arg(short, long)]
        name: String,

        /// e.g. "4 years"
        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        benefits: Option<String>,

        #[arg(long)]
        eligibility: Option<String>,

        /// Placement information
        #[arg(long)]
        placement: Option<String>,
    },

    /// List courses
    Courses {
        /// Only courses of this college
        #[arg(short, long)]
        college: Option<String>,
    },

    /// Recompute course counters from the stored courses
    Reconcile {
        /// Only this college (default: all)
        #[arg(short, long)]
        college: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Deemed,
    Autonomous,
}

impl From<TypeArg> for CollegeType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Deemed => CollegeType::Deemed,
            TypeArg::Autonomous => CollegeType::Autonomous,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    catalog_core::init_tracing(cli.json, level);

    let handle = SurrealHandle::setup_from_env()
        .await
        .context("Failed to connect to catalog database")?;
    let store: Arc<dyn CatalogStore> = Arc::new(SurrealCatalog::new(Arc::new(handle)));

    match cli.command {
        Commands::Colleges => cmd_colleges(store).await,
        Commands::AddCollege {
            name,
            affiliated_to,
            district,
            state,
            college_type,
            established_year,
            website,
            description,
        } => {
            let draft = NewCollegeInput {
                name,
                affiliated_to,
                district,
                state,
                college_type: college_type.map(CollegeType::from),
                established_year,
                website,
                description,
            };
            cmd_add_college(store, draft).await
        }
        Commands::AddCourse {
            college,
            name,
            duration,
            benefits,
            eligibility,
            placement,
        } => {
            let draft = NewCourseInput {
                name,
                duration,
                benefits,
                eligibility,
                placement,
            };
            cmd_add_course(store, CollegeId(college), draft).await
        }
        Commands::Courses { college } => {
            cmd_courses(store, college.map(CollegeId)).await
        }
        Commands::Reconcile { college } => {
            cmd_reconcile(store, college.map(CollegeId)).await
        }
    }
}

/// Print a notice; error notices become the command's failure.
fn report(notice: Notice) -> Result<()> {
    if notice.is_error() {
        bail!(notice.message);
    }
    println!("{}", notice);
    Ok(())
}

/// Open a session. When the college list cannot be loaded, commands that
/// need it fail; the rest continue with an empty directory.
async fn open_session(store: Arc<dyn CatalogStore>, needs_list: bool) -> Result<CatalogSession> {
    let mut session = CatalogSession::new(store);
    if let Some(notice) = session.open().await {
        if needs_list {
            report(notice)?;
        } else {
            println!("{}", Notice::warning(notice.message));
        }
    }
    Ok(session)
}

/// List all colleges
async fn cmd_colleges(store: Arc<dyn CatalogStore>) -> Result<()> {
    let session = open_session(store, true).await?;
    let directory = session.directory();

    if directory.is_empty() {
        println!("No colleges found. Create one with 'catalog add-college'.");
        return Ok(());
    }

    for college in directory.colleges() {
        let kind = college
            .record
            .college_type
            .map(|t| format!(" [{}]", t))
            .unwrap_or_default();
        println!(
            "{}  {}{} ({} courses)",
            college.id, college.record.name, kind, college.record.course_count
        );
    }
    Ok(())
}

/// Create a college
async fn cmd_add_college(store: Arc<dyn CatalogStore>, draft: NewCollegeInput) -> Result<()> {
    let mut session = open_session(store, false).await?;
    session.begin_new_college();

    let submission = session.submit_college(draft).await;
    let created = submission.created;
    report(submission.notice)?;

    if let Some(college) = created {
        println!("Id: {}", college.id);
    }
    Ok(())
}

/// Create a course under an existing college
async fn cmd_add_course(
    store: Arc<dyn CatalogStore>,
    college_id: CollegeId,
    draft: NewCourseInput,
) -> Result<()> {
    let mut session = open_session(store, true).await?;
    if !college_id.is_blank() && session.directory().find(&college_id).is_none() {
        bail!("No college with id '{}'", college_id);
    }
    session.select(college_id);

    let submission = session.submit_course(draft).await;
    let created = submission.created;
    report(submission.notice)?;

    if let Some(course) = created {
        println!("Id: {}", course.id);
        if let Some(college) = session.selected_college() {
            info!(course_count = college.record.course_count, "Counter updated");
        }
    }
    Ok(())
}

/// List courses, optionally for one college
async fn cmd_courses(store: Arc<dyn CatalogStore>, college: Option<CollegeId>) -> Result<()> {
    let courses = store
        .list_courses(college.as_ref())
        .await
        .context("Failed to load courses")?;

    if courses.is_empty() {
        println!("No courses found.");
        return Ok(());
    }

    for course in &courses {
        let record = &course.record;
        println!("{}  {} @ {}", course.id, record.name, record.college_name);
        if let Some(duration) = &record.duration {
            println!("    Duration:    {}", duration);
        }
        if let Some(eligibility) = &record.eligibility {
            println!("    Eligibility: {}", eligibility);
        }
    }
    Ok(())
}

/// Recompute course counters
async fn cmd_reconcile(store: Arc<dyn CatalogStore>, college: Option<CollegeId>) -> Result<()> {
    let reconciler = CountReconciler::new(store);
    let outcomes = match college {
        Some(id) => vec![reconciler
            .recount(&id)
            .await
            .with_context(|| format!("Failed to reconcile college '{}'", id))?],
        None => reconciler
            .recount_all()
            .await
            .context("Failed to reconcile colleges")?,
    };

    for outcome in &outcomes {
        if outcome.corrected() {
            println!(
                "{}: {} -> {}",
                outcome.college_id, outcome.recorded, outcome.actual
            );
        }
    }
    let corrected = outcomes.iter().filter(|o| o.corrected()).count();
    println!("Checked {} colleges, corrected {}", outcomes.len(), corrected);
    Ok(())
}
