//! Content operations — presigned previews, uploads, downloads, removal.

pub mod service;

pub use service::ContentService;
