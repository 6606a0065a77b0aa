//! Per-session document cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jobs_map_topology::Document;
use tokio::sync::OnceCell;

use crate::{FetchError, ProgressCallback, Source, fetch_document, null_progress};

/// The two documents a map needs, each loaded at most once.
///
/// Loaded documents are immutable and never invalidated. Concurrent first
/// requests for the same document share one load.
pub struct SessionData {
    client: reqwest::Client,
    tracts_source: Source,
    basemap_source: Source,
    tracts: OnceCell<Document>,
    basemap: OnceCell<Document>,
    tracts_progress: Arc<dyn ProgressCallback>,
    basemap_progress: Arc<dyn ProgressCallback>,
    loads: AtomicUsize,
}

impl SessionData {
    /// Creates a session reading the tract and basemap documents from the
    /// given sources.
    #[must_use]
    pub fn new(tracts: Source, basemap: Source) -> Self {
        Self {
            client: reqwest::Client::new(),
            tracts_source: tracts,
            basemap_source: basemap,
            tracts: OnceCell::new(),
            basemap: OnceCell::new(),
            tracts_progress: null_progress(),
            basemap_progress: null_progress(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Reports download progress of each document to its own callback.
    #[must_use]
    pub fn with_progress(
        mut self,
        tracts: Arc<dyn ProgressCallback>,
        basemap: Arc<dyn ProgressCallback>,
    ) -> Self {
        self.tracts_progress = tracts;
        self.basemap_progress = basemap;
        self
    }

    /// The tract document, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the first load fails. A failed load is
    /// not cached, but callers treat it as fatal.
    pub async fn tracts(&self) -> Result<&Document, FetchError> {
        self.tracts
            .get_or_try_init(|| self.load(&self.tracts_source, &self.tracts_progress))
            .await
    }

    /// The basemap document, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the first load fails.
    pub async fn basemap(&self) -> Result<&Document, FetchError> {
        self.basemap
            .get_or_try_init(|| self.load(&self.basemap_source, &self.basemap_progress))
            .await
    }

    /// Loads both documents concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] encountered.
    pub async fn load_all(&self) -> Result<(&Document, &Document), FetchError> {
        tokio::try_join!(self.tracts(), self.basemap())
    }

    /// Number of documents actually read so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn load(
        &self,
        source: &Source,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Document, FetchError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        fetch_document(&self.client, source, progress).await
    }
}
