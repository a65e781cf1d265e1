//! # contenthub-core
//!
//! Core crate for ContentHub. Contains the object store backend trait,
//! configuration schemas, the inbound upload type, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other ContentHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
