//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `courseware_core::storage`. The in-memory backend is always available;
//! the SQLite backend is enabled with the `sqlite` feature.
//!
//! ```bash
//! cargo build -p courseware --features sqlite
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
