//! # contenthub-service
//!
//! Business logic services for ContentHub — the content façade over the
//! object store backend.

pub mod content;

pub use content::ContentService;
