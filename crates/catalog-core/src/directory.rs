//! In-memory directory of colleges.
//!
//! Loaded once per session and refreshed only on request. Between refreshes
//! it can drift from the store: other clients' writes are not seen, and the
//! workflow patches it locally after its own writes.

use std::sync::Arc;

use catalog_state::{CatalogStore, College, CollegeId, CollegePatch};
use tracing::{debug, error, info, instrument};

use crate::error::{CatalogError, Result};

/// Whether the first load has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    Loading,
    Ready,
}

/// Cached list of every college, owned by the session.
pub struct CollegeDirectory {
    store: Arc<dyn CatalogStore>,
    colleges: Vec<College>,
    state: DirectoryState,
    last_created: Option<College>,
}

impl CollegeDirectory {
    /// An empty directory in the `Loading` state; call [`Self::load`] next.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            colleges: Vec::new(),
            state: DirectoryState::Loading,
            last_created: None,
        }
    }

    /// Fetch every college from the store.
    ///
    /// On failure the cache is emptied and the directory still becomes
    /// `Ready`, so the caller can carry on with nothing to select.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[College]> {
        let result = self.store.list_colleges().await;
        self.state = DirectoryState::Ready;

        match result {
            Ok(colleges) => {
                info!(count = colleges.len(), "College directory loaded");
                self.colleges = colleges;
                Ok(&self.colleges)
            }
            Err(e) => {
                error!(error = %e, "Failed to load college directory");
                self.colleges.clear();
                Err(CatalogError::StoreRead(e))
            }
        }
    }

    /// Reload from the store, discarding any local patches.
    pub async fn refresh(&mut self) -> Result<&[College]> {
        debug!("Refreshing college directory");
        self.load().await
    }

    pub fn state(&self) -> DirectoryState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == DirectoryState::Ready
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }

    pub fn find(&self, id: &CollegeId) -> Option<&College> {
        self.colleges.iter().find(|c| &c.id == id)
    }

    /// The college most recently created through this directory's session.
    ///
    /// Kept separately from the cached list so it survives a refresh that
    /// fails or does not yet see the new document.
    pub fn last_created(&self) -> Option<&College> {
        self.last_created.as_ref()
    }

    /// Append a college this session just created.
    pub(crate) fn push(&mut self, college: College) {
        self.last_created = Some(college.clone());
        self.colleges.push(college);
    }

    /// Mirror a counter merge that the store accepted.
    pub(crate) fn apply_patch(&mut self, id: &CollegeId, patch: &CollegePatch) {
        if let Some(college) = self.colleges.iter_mut().find(|c| &c.id == id) {
            college.record.course_count = patch.course_count;
            college.record.updated_at = patch.updated_at;
        }
    }
}
