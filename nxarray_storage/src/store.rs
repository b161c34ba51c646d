//! Stores implementing the storage traits.

mod memory_store;

pub use memory_store::MemoryStore;
