//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], an in-memory [`SqliteGallery`] plus helpers for
//! building the fixtures the tests share.

#![allow(dead_code)]

use chrono::Utc;
use gallery::models::{Category, Image, ImageDraft, ImageFile};
use gallery::{CategoryRepository, ImageRepository, SqliteGallery};

/// Test harness wrapping a gallery backed by a private in-memory database.
pub struct TestHarness {
    pub gallery: SqliteGallery,
}

impl TestHarness {
    pub fn new() -> Self {
        let gallery = SqliteGallery::in_memory().expect("failed to create in-memory gallery");
        Self { gallery }
    }

    pub fn category(&self, name: &str) -> Category {
        self.gallery
            .create_category(name)
            .expect("failed to create category")
    }

    pub fn image(&self, title: &str, age_limit: i32) -> Image {
        self.gallery
            .create_image(image_draft(title, age_limit))
            .expect("failed to create image")
    }

    /// "Sunset" (age limit 18) linked to the given categories in order.
    pub fn sunset_with(&self, categories: &[&Category]) -> Image {
        let image = self.image("Sunset", 18);
        for category in categories {
            self.gallery
                .add_category(image.id, category.id)
                .expect("failed to link category");
        }
        image
    }
}

/// The upload every fixture image uses: three bytes of JPEG-typed payload.
pub fn test_image_file() -> ImageFile {
    ImageFile::new("test_image.jpg", vec![0x00u8, 0x01, 0x02]).with_content_type("image/jpeg")
}

pub fn image_draft(title: &str, age_limit: i32) -> ImageDraft {
    ImageDraft::new()
        .title(title)
        .file(test_image_file())
        .created_date(Utc::now().date_naive())
        .age_limit(age_limit)
}
