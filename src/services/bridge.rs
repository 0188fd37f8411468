//! Serialized command bridge between the UI and the host process.
//!
//! Every call travels as a [`Request`] and comes back as a JSON value, so the
//! same dispatch serves in-process callers and the HTTP endpoint alike.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::ConfigStore;
use crate::core::errors::{Error, Result};
use crate::services::backend::Backend;
use crate::services::fs::NativeBackend;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Request {
    GetMountPoints,
    #[serde(rename_all = "camelCase")]
    GetFiles { dir_path: String },
    #[serde(rename_all = "camelCase")]
    GetFileContent { file_path: String },
    #[serde(rename_all = "camelCase")]
    SaveFileContent { file_path: String, content: String },
    GetConfig { key: String },
    SetConfig { key: String, value: Value },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetMountPoints => "get_mount_points",
            Request::GetFiles { .. } => "get_files",
            Request::GetFileContent { .. } => "get_file_content",
            Request::SaveFileContent { .. } => "save_file_content",
            Request::GetConfig { .. } => "get_config",
            Request::SetConfig { .. } => "set_config",
        }
    }
}

/// Error body returned to bridge callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        let code = match err {
            Error::NotFound(_) | Error::NotWatching(_) => 404,
            Error::AlreadyWatching(_) => 409,
            Error::Json(_) | Error::Config(_) => 400,
            Error::BackendUnavailable(_) | Error::Timeout(_) => 503,
            Error::Io(_) | Error::Watch(_) | Error::Other(_) => 500,
        };
        ApiError::new(code, err.to_string())
    }
}

pub struct Bridge {
    native: NativeBackend,
    config: ConfigStore,
}

impl Bridge {
    pub fn new(native: NativeBackend, config: ConfigStore) -> Self {
        Self { native, config }
    }

    pub async fn invoke(&self, request: Request) -> Result<Value> {
        tracing::debug!(command = request.name(), "bridge invoke");
        match request {
            Request::GetMountPoints => Ok(serde_json::to_value(self.native.list_roots().await?)?),
            Request::GetFiles { dir_path } => {
                Ok(serde_json::to_value(self.native.list_directory(&dir_path).await?)?)
            }
            Request::GetFileContent { file_path } => {
                Ok(serde_json::to_value(self.native.open_file(&file_path).await?)?)
            }
            Request::SaveFileContent { file_path, content } => {
                self.native.save_file(&file_path, &content).await?;
                Ok(Value::Null)
            }
            Request::GetConfig { key } => Ok(self.config.get(&key)?.unwrap_or(Value::Null)),
            Request::SetConfig { key, value } => {
                self.config.set(key, value)?;
                Ok(Value::Null)
            }
        }
    }

    async fn invoke_as<T: serde::de::DeserializeOwned>(&self, request: Request) -> Result<T> {
        let name = request.name();
        let value = self.invoke(request).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::BackendUnavailable(format!("malformed {name} response: {e}")))
    }
}

#[async_trait]
impl Backend for Bridge {
    async fn list_roots(&self) -> Result<Vec<String>> {
        self.invoke_as(Request::GetMountPoints).await
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<String>> {
        self.invoke_as(Request::GetFiles {
            dir_path: path.to_string(),
        })
        .await
    }

    async fn open_file(&self, path: &str) -> Result<Option<String>> {
        self.invoke_as(Request::GetFileContent {
            file_path: path.to_string(),
        })
        .await
    }
}
