use crate::core::errors::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Reads a file as UTF-8 text. Binary content yields `Ok(None)`.
pub fn read_text(path: &str) -> Result<Option<String>> {
    let bytes = fs::read(Path::new(path)).map_err(|e| not_found_or_io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            tracing::debug!("{} is not valid UTF-8", path);
            Ok(None)
        }
    }
}

pub fn write_text(path: &str, content: &str) -> Result<()> {
    fs::write(Path::new(path), content).map_err(|e| {
        tracing::warn!("failed to save {}: {}", path, e);
        Error::Io(e)
    })
}

fn not_found_or_io(path: &str, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::NotFound(path.to_string())
    } else {
        tracing::warn!("failed to read {}: {}", path, e);
        Error::Io(e)
    }
}
