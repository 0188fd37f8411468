use serde::{Deserialize, Serialize};

/// Path separator used on the wire, regardless of platform.
pub const SEPARATOR: char = '/';

const ERROR_PREFIX: &str = "(OS ERROR ";

/// A single listing item as returned by the backend.
///
/// The name alone carries the kind: a trailing separator marks a directory,
/// and `(OS ERROR <code>)` marks an entry the backend failed to enumerate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Error(u64),
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn directory(name: &str) -> Self {
        Self::new(format!("{}{}", name.trim_end_matches(SEPARATOR), SEPARATOR))
    }

    pub fn os_error(code: u64) -> Self {
        Self::new(format!("{ERROR_PREFIX}{code})"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        if let Some(code) = parse_error_code(&self.name) {
            EntryKind::Error(code)
        } else if self.name.ends_with(SEPARATOR) {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind(), EntryKind::Error(_))
    }

    /// Error sentinels are shown but never activated.
    pub fn is_navigable(&self) -> bool {
        !self.is_error()
    }

    /// Name without the directory separator.
    pub fn display_name(&self) -> &str {
        match self.kind() {
            EntryKind::Directory => self.name.trim_end_matches(SEPARATOR),
            _ => &self.name,
        }
    }

    /// File name up to its last dot.
    pub fn stem(&self) -> &str {
        match self.kind() {
            EntryKind::File => match self.name.rfind('.') {
                Some(ix) => &self.name[..ix],
                None => &self.name,
            },
            _ => self.display_name(),
        }
    }

    /// Upper-cased extension for files, the whole sentinel for errors.
    pub fn label(&self) -> String {
        match self.kind() {
            EntryKind::Directory => String::new(),
            EntryKind::Error(_) => self.name.clone(),
            EntryKind::File => match self.name.rfind('.') {
                Some(ix) => self.name[ix + 1..].trim().to_uppercase(),
                None => String::new(),
            },
        }
    }

    pub fn into_name(self) -> String {
        self.name
    }
}

impl From<String> for Entry {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Entry {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Any run of digits marks a sentinel; codes too large for `u64` saturate.
fn parse_error_code(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(ERROR_PREFIX)?.strip_suffix(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Shortens `text` to at most `max` characters plus an ellipsis, keeping
/// both ends.
pub fn truncate_middle(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let half = max / 2;
    let start: String = text.chars().take(half).collect();
    let end: String = text.chars().skip(len - half).collect();
    format!("{start}...{end}")
}
