//! Path arithmetic on wire paths (`/`-separated, directories end in `/`).

use crate::models::SEPARATOR;

/// Appends `name` to `base` with exactly one separator at the join point.
pub fn join(base: &str, name: &str) -> String {
    let base = base.strip_suffix(SEPARATOR).unwrap_or(base);
    let name = name.strip_prefix(SEPARATOR).unwrap_or(name);
    format!("{base}{SEPARATOR}{name}")
}

/// Directory form of `path`: `/` separators and a trailing `/`.
pub fn as_dir(path: &str) -> String {
    let mut dir = path.replace('\\', "/");
    if !dir.ends_with(SEPARATOR) {
        dir.push(SEPARATOR);
    }
    dir
}

/// Drops the last segment together with the separator before it.
///
/// A path with a single segment, such as `C:/` or `/`, is its own parent.
pub fn parent(path: &str) -> String {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    match trimmed.rfind(SEPARATOR) {
        Some(ix) => trimmed[..=ix].to_string(),
        None => path.to_string(),
    }
}

/// Splits a file path into its directory (with trailing separator) and name.
pub fn split_file(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(ix) => (&path[..=ix], &path[ix + 1..]),
        None => ("", path),
    }
}

pub fn is_within(path: &str, root: &str) -> bool {
    path.starts_with(root)
}
