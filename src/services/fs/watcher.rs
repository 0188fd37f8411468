use crate::core::errors::{Error, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Emitted when a watched file is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChanged {
    pub path: String,
    pub content: String,
}

/// Debounced watch on a single file. Dropping it stops the watch.
pub struct FileWatcher {
    path: String,
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl FileWatcher {
    pub fn new(path: &str, tx: mpsc::Sender<FileChanged>, debounce: Duration) -> Result<Self> {
        let watched = PathBuf::from(path);
        let target = fs::canonicalize(&watched).unwrap_or_else(|_| watched.clone());
        let reported = path.to_string();

        let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| match res {
            Ok(events) => {
                if !events.iter().any(|e| same_file(&e.path, &target)) {
                    return;
                }
                match fs::read_to_string(&target) {
                    Ok(content) => {
                        // The handler runs on notify's own thread.
                        let change = FileChanged {
                            path: reported.clone(),
                            content,
                        };
                        if let Err(e) = tx.blocking_send(change) {
                            tracing::debug!("watch receiver dropped: {}", e);
                        }
                    }
                    Err(e) => tracing::warn!("failed to read watched file {}: {}", reported, e),
                }
            }
            Err(e) => {
                tracing::warn!("watcher error: {:?}", e);
            }
        })?;

        debouncer
            .watcher()
            .watch(&watched, RecursiveMode::NonRecursive)?;
        tracing::info!("watching {}", path);

        Ok(Self {
            path: path.to_string(),
            _debouncer: debouncer,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        tracing::info!("stopped watching {}", self.path);
    }
}

fn same_file(candidate: &Path, target: &Path) -> bool {
    candidate == target
        || fs::canonicalize(candidate)
            .map(|c| c == target)
            .unwrap_or(false)
}

/// Owns at most one watcher per path.
pub struct WatchRegistry {
    tx: mpsc::Sender<FileChanged>,
    debounce: Duration,
    watchers: HashMap<String, FileWatcher>,
}

impl WatchRegistry {
    pub fn new(tx: mpsc::Sender<FileChanged>, debounce: Duration) -> Self {
        Self {
            tx,
            debounce,
            watchers: HashMap::new(),
        }
    }

    pub fn start(&mut self, path: &str) -> Result<()> {
        if self.watchers.contains_key(path) {
            return Err(Error::AlreadyWatching(path.to_string()));
        }
        let watcher = FileWatcher::new(path, self.tx.clone(), self.debounce)?;
        self.watchers.insert(path.to_string(), watcher);
        Ok(())
    }

    pub fn stop(&mut self, path: &str) -> Result<()> {
        self.watchers
            .remove(path)
            .map(drop)
            .ok_or_else(|| Error::NotWatching(path.to_string()))
    }

    pub fn is_watching(&self, path: &str) -> bool {
        self.watchers.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }
}
