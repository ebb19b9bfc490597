//! Gallery-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across the gallery crates:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for categories and images
//! - **File Helpers**: Content-type detection for uploaded image payloads
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use gallery_common::{CategoryId, Error, Result};
//! use gallery_common::files::content_type_for;
//!
//! let category_id = CategoryId::new();
//! assert_eq!(content_type_for("sunset.jpg"), "image/jpeg");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("category"))
//! }
//! ```

pub mod error;
pub mod files;
pub mod ids;

pub use error::{Error, Result};
pub use ids::*;
