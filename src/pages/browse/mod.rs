//! Directory navigator behind the browse page.
//!
//! Holds the current root, path, listing and filter query, and turns
//! navigation intents into backend listing requests. Each request carries a
//! sequence number; a response only applies if no newer request was issued
//! in the meantime. Path and listing change together, and only on success.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::core::config::Settings;
use crate::core::errors::{Error, Result};
use crate::models::{Entry, EntryKind};
use crate::pages::Route;
use crate::services::Backend;

pub mod filter;
pub mod path;
pub mod view;

pub use view::{ListingView, VirtualList};

/// Snapshot of everything the browse page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigatorState {
    pub roots: Vec<String>,
    pub current_root: String,
    pub path: String,
    pub listing: Vec<Entry>,
    pub query: String,
    pub loading: bool,
    /// Target of the in-flight request, if any.
    pub pending: Option<String>,
    /// Last failure of the most recent request, for display.
    pub last_error: Option<String>,
}

impl NavigatorState {
    pub fn can_go_back(&self) -> bool {
        self.path != self.current_root
    }

    pub fn visible_entries(&self) -> Vec<Entry> {
        filter::visible_entries(&self.listing, &self.query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn view(&self) -> ListingView {
        ListingView::new(self.loading, self.visible_entries())
    }
}

/// Result of a listing request that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listed {
    Applied(Vec<Entry>),
    /// A newer request was issued while this one was in flight.
    Superseded,
}

/// A file handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub path: String,
    pub directory: String,
    pub name: String,
    pub content: Option<String>,
    pub route: Route,
}

/// What activating an entry did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Listed(Listed),
    Opened(OpenedFile),
    /// Error sentinels cannot be activated.
    Ignored,
}

struct Inner {
    state: NavigatorState,
    latest: u64,
}

pub struct Navigator<B: Backend + ?Sized> {
    backend: Arc<B>,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl<B: Backend + ?Sized> Navigator<B> {
    pub fn new(backend: Arc<B>, settings: &Settings) -> Self {
        Self::with_timeout(backend, settings.request_timeout())
    }

    pub fn with_timeout(backend: Arc<B>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            inner: Mutex::new(Inner {
                state: NavigatorState::default(),
                latest: 0,
            }),
        }
    }

    pub fn state(&self) -> NavigatorState {
        self.lock().state.clone()
    }

    pub fn path(&self) -> String {
        self.lock().state.path.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn can_go_back(&self) -> bool {
        self.lock().state.can_go_back()
    }

    pub fn visible_entries(&self) -> Vec<Entry> {
        self.lock().state.visible_entries()
    }

    pub fn view(&self) -> ListingView {
        self.lock().state.view()
    }

    /// Stores the filter query. The listing is not re-requested.
    pub fn set_filter(&self, query: &str) {
        self.lock().state.query = query.to_string();
    }

    /// Lists the roots, then selects and lists the first one.
    pub async fn start(&self) -> Result<Listed> {
        let roots = self.list_roots().await?;
        match roots.first() {
            Some(root) => self.select_root(root).await,
            None => {
                let err = Error::BackendUnavailable("backend reported no roots".to_string());
                self.lock().state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Refreshes the root set. On failure the set is left empty.
    pub async fn list_roots(&self) -> Result<Vec<String>> {
        match self.call(self.backend.list_roots()).await {
            Ok(roots) => {
                tracing::debug!(count = roots.len(), "roots listed");
                self.lock().state.roots = roots.clone();
                Ok(roots)
            }
            Err(e) => {
                tracing::warn!("failed to list roots: {}", e);
                let mut inner = self.lock();
                inner.state.roots.clear();
                inner.state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn select_root(&self, root: &str) -> Result<Listed> {
        if !self.lock().state.roots.iter().any(|r| r == root) {
            return Err(Error::NotFound(format!("root {root}")));
        }
        self.navigate(root.to_string(), Some(root.to_string())).await
    }

    /// Lists `path` and makes it current on success.
    pub async fn list_directory(&self, path: &str) -> Result<Listed> {
        let target = path::as_dir(path);
        let root = {
            let inner = self.lock();
            owning_root(&inner.state, &target)
        };
        self.navigate(target, root).await
    }

    /// Descends into a directory entry, or opens a file entry.
    pub async fn descend(&self, entry_name: &str) -> Result<Activation> {
        let entry = Entry::new(entry_name);
        let base = self.path();
        match entry.kind() {
            EntryKind::Error(code) => {
                tracing::debug!(code, "ignoring error entry");
                Ok(Activation::Ignored)
            }
            EntryKind::Directory => {
                let target = path::join(&base, entry.name());
                let listed = self.navigate(target, None).await?;
                Ok(Activation::Listed(listed))
            }
            EntryKind::File => {
                let target = path::join(&base, entry.name());
                let opened = self.open(&target).await?;
                Ok(Activation::Opened(opened))
            }
        }
    }

    /// Moves to the parent directory. At the root this is a no-op.
    pub async fn ascend(&self) -> Result<Listed> {
        let (target, root) = {
            let inner = self.lock();
            let state = &inner.state;
            if !state.can_go_back() {
                return Ok(Listed::Applied(state.listing.clone()));
            }
            let parent = path::parent(&state.path);
            let target = if path::is_within(&parent, &state.current_root) {
                parent
            } else {
                state.current_root.clone()
            };
            (target, state.current_root.clone())
        };
        self.navigate(target, Some(root)).await
    }

    pub async fn refresh(&self) -> Result<Listed> {
        let path = self.path();
        self.navigate(path, None).await
    }

    /// Reads a file for the editor without touching navigation state.
    pub async fn open(&self, file_path: &str) -> Result<OpenedFile> {
        let content = self
            .call_raw(self.backend.open_file(file_path))
            .await
            .inspect_err(|e| tracing::warn!("failed to open {}: {}", file_path, e))?;
        let (directory, name) = path::split_file(file_path);
        Ok(OpenedFile {
            path: file_path.to_string(),
            directory: directory.to_string(),
            name: name.to_string(),
            content,
            route: Route::Editor,
        })
    }

    async fn navigate(&self, target: String, root: Option<String>) -> Result<Listed> {
        let seq = {
            let mut inner = self.lock();
            inner.latest += 1;
            inner.state.loading = true;
            inner.state.pending = Some(target.clone());
            inner.latest
        };
        let mut in_flight = InFlight {
            inner: &self.inner,
            seq,
            settled: false,
        };
        tracing::debug!(seq, path = %target, "listing");

        let result = self.call(self.backend.list_directory(&target)).await;
        in_flight.settled = true;

        let mut inner = self.lock();
        if seq != inner.latest {
            match &result {
                Ok(_) => tracing::debug!(seq, latest = inner.latest, path = %target, "discarding stale listing"),
                Err(e) => tracing::debug!(seq, latest = inner.latest, path = %target, "discarding stale failure: {}", e),
            }
            return Ok(Listed::Superseded);
        }

        let state = &mut inner.state;
        state.loading = false;
        state.pending = None;
        match result {
            Ok(names) => {
                let entries: Vec<Entry> = names.into_iter().map(Entry::from).collect();
                if let Some(root) = root {
                    state.current_root = root;
                }
                state.path = target;
                state.listing = entries.clone();
                state.last_error = None;
                Ok(Listed::Applied(entries))
            }
            Err(e) => {
                tracing::warn!(path = %target, "failed to list directory: {}", e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Bounded backend call; every failure counts as the backend being
    /// unavailable.
    async fn call<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        self.call_raw(fut).await.map_err(|e| match e {
            Error::BackendUnavailable(_) | Error::Timeout(_) => e,
            other => Error::BackendUnavailable(other.to_string()),
        })
    }

    async fn call_raw<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the loading flag when a request is dropped before it settles.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    seq: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.latest == self.seq {
            tracing::debug!(seq = self.seq, "listing request dropped");
            inner.state.loading = false;
            inner.state.pending = None;
        }
    }
}

/// Longest known root containing `path`, if it differs from the current one.
fn owning_root(state: &NavigatorState, path: &str) -> Option<String> {
    if !state.current_root.is_empty() && path::is_within(path, &state.current_root) {
        return None;
    }
    state
        .roots
        .iter()
        .filter(|root| path::is_within(path, root))
        .max_by_key(|root| root.len())
        .cloned()
}
