use crate::core::errors::{Error, Result};
use crate::models::{Entry, SEPARATOR};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use tokio::task;

pub struct ListParams<'a> {
    pub path: &'a str,
    /// When non-empty, files are kept only if their extension is listed.
    pub extensions: &'a [String],
}

pub async fn list_dir(params: ListParams<'_>) -> Result<Vec<Entry>> {
    // Directory reads block; keep them off the async executor.
    let path = params.path.to_string();
    let extensions = params.extensions.to_vec();

    task::spawn_blocking(move || list_dir_impl(&path, &extensions))
        .await
        .map_err(|e| Error::Other(format!("listing task failed: {e}")))?
}

/// Synchronous variant for contexts without an async runtime.
pub fn list_dir_sync(params: ListParams<'_>) -> Result<Vec<Entry>> {
    list_dir_impl(params.path, params.extensions)
}

fn list_dir_impl(path: &str, extensions: &[String]) -> Result<Vec<Entry>> {
    let dir = Path::new(path);
    let mut entries = Vec::new();

    // Failing to open the directory itself is an error; anything that fails
    // past that point is reported in-band on the entry.
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                entries.push(sentinel(&e));
                continue;
            }
        };
        let name = os_str_to_string(entry.file_name());
        match is_directory(&entry) {
            Ok(true) => entries.push(Entry::directory(&name)),
            Ok(false) => {
                if matches_extension(&name, extensions) {
                    entries.push(Entry::new(name));
                }
            }
            Err(e) => {
                tracing::debug!("cannot stat {:?}: {}", entry.path(), e);
                entries.push(sentinel(&e));
            }
        }
    }

    sort_entries(&mut entries);
    Ok(entries)
}

fn is_directory(entry: &fs::DirEntry) -> io::Result<bool> {
    let file_type = entry.file_type()?;
    if file_type.is_symlink() {
        // Follow links so a link to a directory can be descended into.
        return Ok(fs::metadata(entry.path())?.is_dir());
    }
    Ok(file_type.is_dir())
}

fn sentinel(e: &io::Error) -> Entry {
    let code = e.raw_os_error().and_then(|c| u64::try_from(c).ok());
    Entry::os_error(code.unwrap_or(0))
}

fn matches_extension(name: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let ext = match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => return false,
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Files first, then directories, plain byte order within each group.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => a.name().cmp(b.name()),
    });
}

/// Normalises a host path into wire form: `/` separators, trailing `/`.
pub fn to_wire_dir(path: &str) -> String {
    let mut wire = path.replace('\\', "/");
    if !wire.ends_with(SEPARATOR) {
        wire.push(SEPARATOR);
    }
    wire
}

fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}
