//! Shared domain types.

pub mod upload;

pub use upload::UploadedFile;
