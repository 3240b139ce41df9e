//! Storage layer: atomic file primitives and the repository adapters.

mod atomic_json;
mod file_store;
mod memory_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
