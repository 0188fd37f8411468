use crate::models::Entry;

/// Entries whose names contain `query`, ignoring case. The listing itself is
/// never touched; an empty query keeps everything.
pub fn visible_entries<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    if query.is_empty() {
        return entries.iter().collect();
    }
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.name().to_lowercase().contains(&query))
        .collect()
}
