use async_trait::async_trait;
use tokio::task;

use crate::core::errors::{Error, Result};
use crate::models::Entry;
use crate::services::backend::Backend;
use crate::services::fs::listing::{list_dir, ListParams};
use crate::services::fs::{content, mounts};

/// Backend served straight from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct NativeBackend {
    extensions: Vec<String>,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts listed files to the given extensions; directories always show.
    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub async fn save_file(&self, path: &str, text: &str) -> Result<()> {
        let path = path.to_string();
        let text = text.to_string();
        blocking(move || content::write_text(&path, &text)).await
    }
}

#[async_trait]
impl Backend for NativeBackend {
    async fn list_roots(&self) -> Result<Vec<String>> {
        blocking(mounts::list_mounts).await
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<String>> {
        let entries = list_dir(ListParams {
            path,
            extensions: &self.extensions,
        })
        .await?;
        Ok(entries.into_iter().map(Entry::into_name).collect())
    }

    async fn open_file(&self, path: &str) -> Result<Option<String>> {
        let path = path.to_string();
        blocking(move || content::read_text(&path)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("blocking task failed: {e}")))?
}
