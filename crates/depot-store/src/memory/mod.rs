//! In-memory document stores

mod directory;
mod file;
mod grant;
mod user;

pub use directory::MemoryDirectoryStore;
pub use file::MemoryFileStore;
pub use grant::MemoryGrantStore;
pub use user::MemoryUserStore;
