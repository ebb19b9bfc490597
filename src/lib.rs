//! Gallery - categories, images, and the links between them
//!
//! The root crate ties the workspace together: repository traits with their
//! SQLite implementation, configuration loading, and logging setup.
//!
//! ```
//! use gallery::{CategoryRepository, ImageRepository, SqliteGallery};
//! use gallery::models::{ImageDraft, ImageFile};
//!
//! let gallery = SqliteGallery::in_memory().unwrap();
//! let nature = gallery.create_category("Nature").unwrap();
//! let image = gallery
//!     .create_image(
//!         ImageDraft::new()
//!             .title("Sunset")
//!             .file(ImageFile::new("sunset.jpg", vec![0u8, 1, 2]))
//!             .created_date(chrono::NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
//!             .age_limit(18),
//!     )
//!     .unwrap();
//!
//! gallery.add_category(image.id, nature.id).unwrap();
//! gallery.delete_category(nature.id).unwrap();
//! assert_eq!(gallery.count_categories(image.id).unwrap(), 0);
//! ```

pub mod config;
pub mod logging;
pub mod repository;

pub use gallery_common::{CategoryId, Error, ImageId, Result};
pub use gallery_db::models;
pub use repository::{CategoryRepository, ImageRepository, SqliteGallery};
