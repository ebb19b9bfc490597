//! Image database queries.
//!
//! This module provides CRUD operations for images and access to their
//! stored payloads.

use gallery_common::{Error, ImageId, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Image, ImageFile, NewImage, StoredFile};
use crate::queries::{
    date_column, format_date, format_timestamp, id_column, image_categories, now,
    timestamp_column,
};

/// Parse an image from a database row.
///
/// Expects columns in order: id, title, file_name, content_type, file_size,
/// created_date, age_limit, created_at.
pub(crate) fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<Image> {
    Ok(Image {
        id: id_column(row, 0)?,
        title: row.get(1)?,
        file: StoredFile {
            name: row.get(2)?,
            content_type: row.get(3)?,
            size: row.get(4)?,
        },
        created_date: date_column(row, 5)?,
        age_limit: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

/// Insert a new image.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `new_image` - Validated image attributes, see [`crate::models::ImageDraft::validate`]
///
/// # Returns
///
/// * `Ok(Image)` - The stored image
/// * `Err(Error)` - If a database error occurs
pub fn insert_image(conn: &Connection, new_image: &NewImage) -> Result<Image> {
    let image = Image {
        id: ImageId::new(),
        title: new_image.title.clone(),
        file: StoredFile {
            name: new_image.file.name.clone(),
            content_type: new_image.file.content_type.clone(),
            size: new_image.file.data.len() as i64,
        },
        created_date: new_image.created_date,
        age_limit: new_image.age_limit,
        created_at: now(),
    };

    conn.execute(
        "INSERT INTO images (id, title, file_name, content_type, file_size, file_data,
                             created_date, age_limit, created_at)
         VALUES (:id, :title, :file_name, :content_type, :file_size, :file_data,
                 :created_date, :age_limit, :created_at)",
        rusqlite::named_params! {
            ":id": image.id.to_string(),
            ":title": &image.title,
            ":file_name": &image.file.name,
            ":content_type": &image.file.content_type,
            ":file_size": image.file.size,
            ":file_data": &new_image.file.data,
            ":created_date": format_date(&image.created_date),
            ":age_limit": image.age_limit,
            ":created_at": format_timestamp(&image.created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(image_id = %image.id, bytes = image.file.size, "Stored image '{}'", image.title);

    Ok(image)
}

/// Get an image by ID.
///
/// # Returns
///
/// * `Ok(Some(Image))` - The image if found
/// * `Ok(None)` - If the image does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<Image>> {
    let result = conn.query_row(
        "SELECT id, title, file_name, content_type, file_size, created_date, age_limit, created_at
         FROM images WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get the single image with the given title.
///
/// # Returns
///
/// * `Ok(Image)` - The matching image
/// * `Err(Error::NotFound)` - If no image has that title
/// * `Err(Error::MultipleFound)` - If more than one image has that title
pub fn get_image_by_title(conn: &Connection, title: &str) -> Result<Image> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, file_name, content_type, file_size, created_date, age_limit, created_at
             FROM images
             WHERE title = :title
             ORDER BY created_at
             LIMIT 2",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let mut matches = stmt
        .query_map(rusqlite::named_params! { ":title": title }, parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    match matches.len() {
        0 => Err(Error::not_found(format!("image titled '{}'", title))),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::multiple_found(format!("image titled '{}'", title))),
    }
}

/// List all images, newest first.
pub fn list_images(conn: &Connection) -> Result<Vec<Image>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, file_name, content_type, file_size, created_date, age_limit, created_at
             FROM images
             ORDER BY created_at DESC, rowid DESC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map([], parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Count all images.
pub fn count_images(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Check whether an image exists.
pub fn image_exists(conn: &Connection, id: ImageId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM images WHERE id = :id)",
        rusqlite::named_params! { ":id": id.to_string() },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Load the stored payload of an image.
///
/// # Returns
///
/// * `Ok(Some(ImageFile))` - Name, content type and bytes
/// * `Ok(None)` - If the image does not exist
pub fn get_image_file(conn: &Connection, id: ImageId) -> Result<Option<ImageFile>> {
    conn.query_row(
        "SELECT file_name, content_type, file_data FROM images WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        |row| {
            Ok(ImageFile {
                name: row.get(0)?,
                content_type: row.get(1)?,
                data: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Delete an image and its category links.
///
/// Categories are never deleted with an image.
///
/// # Returns
///
/// * `Ok(())` - If the image was deleted
/// * `Err(Error::NotFound)` - If the image does not exist
pub fn delete_image(conn: &Connection, id: ImageId) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    image_categories::clear_categories_for_image(&tx, id)?;

    let rows_affected = tx
        .execute(
            "DELETE FROM images WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected == 0 {
        return Err(Error::not_found(format!("image {}", id)));
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(image_id = %id, "Deleted image");

    Ok(())
}
