pub mod entry;

pub use entry::{truncate_middle, Entry, EntryKind, SEPARATOR};
