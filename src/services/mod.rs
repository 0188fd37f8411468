pub mod backend;
pub mod bridge;
pub mod fs;
pub mod server;

pub use backend::Backend;
