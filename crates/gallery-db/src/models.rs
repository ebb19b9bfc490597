//! Internal Rust models matching the database schema.
//!
//! This module provides strongly-typed Rust structures that map to database tables,
//! plus the validated input types used to create images.

use chrono::{DateTime, NaiveDate, Utc};
use gallery_common::files::content_type_for;
use gallery_common::{CategoryId, Error, ImageId, Result};
use serde::{Deserialize, Serialize};

/// Longest accepted category name or image title, in characters.
pub const MAX_LABEL_LEN: usize = 100;

/// A named classification tag attachable to images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reference to the payload stored with an image row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub content_type: String,
    pub size: i64,
}

/// A persisted media record.
///
/// The payload bytes are not loaded with the record; fetch them with
/// [`crate::queries::images::get_image_file`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub title: String,
    pub file: StoredFile,
    pub created_date: NaiveDate,
    pub age_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// An uploaded file: raw bytes plus the name and content type it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageFile {
    /// Create a file whose content type is derived from its extension.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            data: data.into(),
        }
    }

    /// Override the detected content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Image attributes as submitted, before validation.
///
/// Every attribute is required; [`ImageDraft::validate`] reports the first
/// one that is missing or unusable.
#[derive(Debug, Clone, Default)]
pub struct ImageDraft {
    pub title: Option<String>,
    pub file: Option<ImageFile>,
    pub created_date: Option<NaiveDate>,
    pub age_limit: Option<i32>,
}

impl ImageDraft {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn file(mut self, file: ImageFile) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn created_date(mut self, date: NaiveDate) -> Self {
        self.created_date = Some(date);
        self
    }

    #[must_use]
    pub fn age_limit(mut self, age_limit: i32) -> Self {
        self.age_limit = Some(age_limit);
        self
    }

    /// Check every required attribute and produce a [`NewImage`].
    ///
    /// The file must be present and named; a zero-length payload is accepted.
    pub fn validate(self) -> Result<NewImage> {
        let title = self
            .title
            .ok_or_else(|| Error::validation("title is required"))?;
        validate_label("title", &title)?;

        let file = self
            .file
            .ok_or_else(|| Error::validation("image file is required"))?;
        if file.name.trim().is_empty() {
            return Err(Error::validation("image file name is required"));
        }
        if file.content_type.trim().is_empty() {
            return Err(Error::validation("image content type is required"));
        }

        let created_date = self
            .created_date
            .ok_or_else(|| Error::validation("created_date is required"))?;

        let age_limit = self
            .age_limit
            .ok_or_else(|| Error::validation("age_limit is required"))?;
        if age_limit < 0 {
            return Err(Error::validation(format!(
                "age_limit must not be negative (got {})",
                age_limit
            )));
        }

        Ok(NewImage {
            title,
            file,
            created_date,
            age_limit,
        })
    }
}

/// A validated image, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub title: String,
    pub file: ImageFile,
    pub created_date: NaiveDate,
    pub age_limit: i32,
}

/// Validate a category name.
pub fn validate_category_name(name: &str) -> Result<()> {
    validate_label("name", name)
}

fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} must not be blank", field)));
    }
    let len = value.chars().count();
    if len > MAX_LABEL_LEN {
        return Err(Error::validation(format!(
            "{} is {} characters, at most {} allowed",
            field, len, MAX_LABEL_LEN
        )));
    }
    Ok(())
}
