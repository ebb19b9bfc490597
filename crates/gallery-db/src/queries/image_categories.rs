//! Image/category link queries.
//!
//! Each row of `image_categories` records one (image, category) membership.
//! The pair is unique, so linking is idempotent, and the autoincrement key
//! gives memberships a stable link order.

use gallery_common::{CategoryId, Error, ImageId, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Category, Image};
use crate::queries::categories::{category_exists, parse_category_row};
use crate::queries::images::{image_exists, parse_image_row};
use crate::queries::{format_timestamp, now};

/// Link a category to an image.
///
/// # Returns
///
/// * `Ok(true)` - If a new link was created
/// * `Ok(false)` - If the image already had the category
/// * `Err(Error::NotFound)` - If the image or the category does not exist
pub fn add_category(conn: &Connection, image_id: ImageId, category_id: CategoryId) -> Result<bool> {
    if !image_exists(conn, image_id)? {
        return Err(Error::not_found(format!("image {}", image_id)));
    }
    if !category_exists(conn, category_id)? {
        return Err(Error::not_found(format!("category {}", category_id)));
    }

    let rows_affected = conn
        .execute(
            "INSERT OR IGNORE INTO image_categories (image_id, category_id, linked_at)
             VALUES (:image_id, :category_id, :linked_at)",
            rusqlite::named_params! {
                ":image_id": image_id.to_string(),
                ":category_id": category_id.to_string(),
                ":linked_at": format_timestamp(&now()),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected > 0 {
        tracing::debug!(%image_id, %category_id, "Linked category to image");
    }

    Ok(rows_affected > 0)
}

/// Unlink a category from an image.
///
/// # Returns
///
/// * `Ok(true)` - If the link existed and was removed
/// * `Ok(false)` - If there was no such link
pub fn remove_category(
    conn: &Connection,
    image_id: ImageId,
    category_id: CategoryId,
) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM image_categories
             WHERE image_id = :image_id AND category_id = :category_id",
            rusqlite::named_params! {
                ":image_id": image_id.to_string(),
                ":category_id": category_id.to_string(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Check whether an image has a category.
pub fn has_category(conn: &Connection, image_id: ImageId, category_id: CategoryId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM image_categories
                       WHERE image_id = :image_id AND category_id = :category_id)",
        rusqlite::named_params! {
            ":image_id": image_id.to_string(),
            ":category_id": category_id.to_string(),
        },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// List the categories of an image in link order.
pub fn list_categories_for_image(conn: &Connection, image_id: ImageId) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.name, c.created_at
             FROM image_categories ic
             JOIN categories c ON c.id = ic.category_id
             WHERE ic.image_id = :image_id
             ORDER BY ic.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let categories = stmt
        .query_map(
            rusqlite::named_params! { ":image_id": image_id.to_string() },
            parse_category_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(categories)
}

/// List the images carrying a category in link order.
pub fn list_images_for_category(conn: &Connection, category_id: CategoryId) -> Result<Vec<Image>> {
    let mut stmt = conn
        .prepare(
            "SELECT i.id, i.title, i.file_name, i.content_type, i.file_size,
                    i.created_date, i.age_limit, i.created_at
             FROM image_categories ic
             JOIN images i ON i.id = ic.image_id
             WHERE ic.category_id = :category_id
             ORDER BY ic.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map(
            rusqlite::named_params! { ":category_id": category_id.to_string() },
            parse_image_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Count the categories currently linked to an image.
pub fn count_categories_for_image(conn: &Connection, image_id: ImageId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM image_categories WHERE image_id = :image_id",
        rusqlite::named_params! { ":image_id": image_id.to_string() },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get the earliest-linked category of an image still present.
pub fn first_category_for_image(conn: &Connection, image_id: ImageId) -> Result<Option<Category>> {
    conn.query_row(
        "SELECT c.id, c.name, c.created_at
         FROM image_categories ic
         JOIN categories c ON c.id = ic.category_id
         WHERE ic.image_id = :image_id
         ORDER BY ic.id
         LIMIT 1",
        rusqlite::named_params! { ":image_id": image_id.to_string() },
        parse_category_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Remove every category link of an image.
///
/// # Returns
///
/// * `Ok(u64)` - Number of links removed
pub fn clear_categories_for_image(conn: &Connection, image_id: ImageId) -> Result<u64> {
    let rows_affected = conn
        .execute(
            "DELETE FROM image_categories WHERE image_id = :image_id",
            rusqlite::named_params! { ":image_id": image_id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected as u64)
}

/// Remove a category from every image that carries it.
///
/// # Returns
///
/// * `Ok(u64)` - Number of links removed
pub fn unlink_category(conn: &Connection, category_id: CategoryId) -> Result<u64> {
    let rows_affected = conn
        .execute(
            "DELETE FROM image_categories WHERE category_id = :category_id",
            rusqlite::named_params! { ":category_id": category_id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected as u64)
}
