pub mod content;
pub mod listing;
pub mod mounts;
pub mod native;
pub mod watcher;

pub use native::NativeBackend;
