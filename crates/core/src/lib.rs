//! Functional core for courseware.
//!
//! Holds the domain types, the storage and cache contracts, and the
//! cache-aside layer that sits between the catalog service and the
//! repositories. Concrete backends live in the `courseware` crate.

pub mod auth;
pub mod cache;
pub mod course;
pub mod serde;
pub mod storage;
