//! # contenthub-storage
//!
//! S3-compatible object store implementation for ContentHub. Works
//! against AWS S3 and MinIO-style deployments.

pub mod client;
pub mod s3;

pub use s3::S3ObjectStore;
