//! In-memory storage backend.
//!
//! Stores courses and enrollments in HashMaps wrapped in `Arc<RwLock<_>>`.
//! Used by default and in tests; data is lost when the process exits.

mod repository;

pub use repository::InMemoryRepository;
