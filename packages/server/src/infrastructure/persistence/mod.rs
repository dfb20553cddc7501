//! `DocumentStore` implementations.
//!
//! - `file`: JSON file rewritten wholesale through a temp file + rename
//! - `memory`: volatile store for ephemeral runs and tests

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
