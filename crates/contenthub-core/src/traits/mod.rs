//! Trait definitions implemented by other ContentHub crates.

pub mod object_store;

pub use object_store::{ByteStream, ObjectStore};
