//! Utility modules for validation and storage implementations

pub mod fallback_store;
pub mod memory_store;
pub mod validation;

pub use fallback_store::FallbackRunStore;
pub use memory_store::MemoryRunStore;
