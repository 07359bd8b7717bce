pub mod disk;
pub mod engine;
pub mod mem;

// Re-export main types for convenience
pub use disk::DiskStorage;
pub use engine::RowStore;
pub use mem::MemStorage;
