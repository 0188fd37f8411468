use async_trait::async_trait;

use crate::core::errors::Result;

/// Request/response channel to the host process that owns the filesystem.
///
/// Per-entry enumeration failures come back in-band as `(OS ERROR <code>)`
/// names; an `Err` means the call itself failed.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Available drives or mount points, each ending in `/`.
    async fn list_roots(&self) -> Result<Vec<String>>;

    /// Entry names in `path`; directories end in `/`.
    async fn list_directory(&self, path: &str) -> Result<Vec<String>>;

    /// Text content for the editor, or `None` when the file is not text.
    async fn open_file(&self, path: &str) -> Result<Option<String>>;
}
