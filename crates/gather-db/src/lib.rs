//! # gather-db
//!
//! Storage layer for Gather. Exposes the [`DocumentStore`] boundary that the
//! services talk to, an in-memory implementation for tests and single-node
//! deployments, and repository functions organized by domain.

pub mod collections;
pub mod json_compat;
pub mod memory;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use store::{Document, DocumentStore, Filter, UniqueIndex};
