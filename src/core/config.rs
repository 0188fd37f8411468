use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::errors::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "./assets/config.json";

/// Key under which the browser [`Settings`] live in the store.
pub const SETTINGS_KEY: &str = "browser";

/// JSON object file holding arbitrary configuration values by key.
///
/// A missing file reads as an empty object; the file is created on the
/// first [`ConfigStore::set`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read()?.get(key).cloned())
    }

    pub fn set(&self, key: impl Into<String>, value: Value) -> Result<()> {
        let mut data = self.read()?;
        data.insert(key.into(), value);
        self.write(&data)
    }

    pub fn settings(&self) -> Result<Settings> {
        match self.get(SETTINGS_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Settings::default()),
        }
    }

    fn read(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&contents)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Config(format!(
                "{} must contain a JSON object, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write(&self, data: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Browser tuning knobs. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub request_timeout_ms: u64,
    pub item_height: u32,
    pub chrome_height: u32,
    /// Empty means every file is listed.
    pub extensions: Vec<String>,
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            item_height: 150,
            chrome_height: 75,
            extensions: Vec::new(),
            bind: "127.0.0.1:7878".to_string(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
