//! Category database queries.
//!
//! This module provides CRUD operations for categories. Deleting a category
//! removes its links to images inside the same transaction; the images
//! themselves are never touched.

use gallery_common::{CategoryId, Error, Result};
use rusqlite::Connection;

use crate::models::{validate_category_name, Category};
use crate::queries::{format_timestamp, id_column, image_categories, now, timestamp_column};

/// Parse a category from a database row.
///
/// Expects columns in order: id, name, created_at.
pub(crate) fn parse_category_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: id_column(row, 0)?,
        name: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
    })
}

/// Create a new category.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `name` - Human-readable label
///
/// # Returns
///
/// * `Ok(Category)` - The created category
/// * `Err(Error::Validation)` - If the name is blank or too long
/// * `Err(Error)` - If a database error occurs
pub fn create_category(conn: &Connection, name: &str) -> Result<Category> {
    validate_category_name(name)?;

    let category = Category {
        id: CategoryId::new(),
        name: name.to_string(),
        created_at: now(),
    };

    conn.execute(
        "INSERT INTO categories (id, name, created_at) VALUES (:id, :name, :created_at)",
        rusqlite::named_params! {
            ":id": category.id.to_string(),
            ":name": &category.name,
            ":created_at": format_timestamp(&category.created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(category_id = %category.id, "Created category '{}'", category.name);

    Ok(category)
}

/// Get a category by ID.
///
/// # Returns
///
/// * `Ok(Some(Category))` - The category if found
/// * `Ok(None)` - If the category does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_category(conn: &Connection, id: CategoryId) -> Result<Option<Category>> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM categories WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_category_row,
    );

    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get the single category with the given name.
///
/// # Returns
///
/// * `Ok(Category)` - The matching category
/// * `Err(Error::NotFound)` - If no category has that name
/// * `Err(Error::MultipleFound)` - If more than one category has that name
pub fn get_category_by_name(conn: &Connection, name: &str) -> Result<Category> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, created_at FROM categories
             WHERE name = :name
             ORDER BY created_at
             LIMIT 2",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let mut matches = stmt
        .query_map(rusqlite::named_params! { ":name": name }, parse_category_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    match matches.len() {
        0 => Err(Error::not_found(format!("category named '{}'", name))),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::multiple_found(format!("category named '{}'", name))),
    }
}

/// List all categories ordered by name.
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name, created_at FROM categories ORDER BY name, created_at")
        .map_err(|e| Error::database(e.to_string()))?;

    let categories = stmt
        .query_map([], parse_category_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(categories)
}

/// Count all categories.
pub fn count_categories(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Check whether a category exists.
pub fn category_exists(conn: &Connection, id: CategoryId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = :id)",
        rusqlite::named_params! { ":id": id.to_string() },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Rename a category.
///
/// # Returns
///
/// * `Ok(())` - If the update succeeded
/// * `Err(Error::NotFound)` - If the category does not exist
/// * `Err(Error::Validation)` - If the new name is blank or too long
pub fn rename_category(conn: &Connection, id: CategoryId, name: &str) -> Result<()> {
    validate_category_name(name)?;

    let rows_affected = conn
        .execute(
            "UPDATE categories SET name = :name WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.to_string(),
                ":name": name,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected == 0 {
        return Err(Error::not_found(format!("category {}", id)));
    }

    Ok(())
}

/// Delete a category and every link that references it.
///
/// Both deletes run in one transaction. Linked images keep existing with one
/// category fewer.
///
/// # Returns
///
/// * `Ok(u64)` - Number of image links that were removed
/// * `Err(Error::NotFound)` - If the category does not exist (including a
///   second delete of the same category)
pub fn delete_category(conn: &Connection, id: CategoryId) -> Result<u64> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let unlinked = image_categories::unlink_category(&tx, id)?;

    let rows_affected = tx
        .execute(
            "DELETE FROM categories WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows_affected == 0 {
        // Dropping `tx` rolls back
        return Err(Error::not_found(format!("category {}", id)));
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(category_id = %id, unlinked, "Deleted category");

    Ok(unlinked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageDraft, ImageFile};
    use crate::pool::init_memory_pool;
    use crate::queries::images::{count_images, insert_image};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn create_test_image(conn: &Connection, title: &str) -> gallery_common::ImageId {
        let new_image = ImageDraft::new()
            .title(title)
            .file(ImageFile::new("test_image.jpg", vec![0u8, 1, 2]))
            .created_date(Utc::now().date_naive())
            .age_limit(18)
            .validate()
            .unwrap();
        insert_image(conn, &new_image).unwrap().id
    }

    #[test]
    fn test_create_category() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let category = create_category(&conn, "Animals").unwrap();
        assert_eq!(category.name, "Animals");
        assert_eq!(category.to_string(), "Animals");
    }

    #[test]
    fn test_create_category_blank_name() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert_matches!(create_category(&conn, "  "), Err(Error::Validation(_)));
        assert_eq!(count_categories(&conn).unwrap(), 0);
    }

    #[test]
    fn test_get_category() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created = create_category(&conn, "Nature").unwrap();
        let found = get_category(&conn, created.id).unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_get_category_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let result = get_category(&conn, CategoryId::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_get_category_by_name() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let nature = create_category(&conn, "Nature").unwrap();
        create_category(&conn, "Mountains").unwrap();

        let found = get_category_by_name(&conn, "Nature").unwrap();
        assert_eq!(found.id, nature.id);
    }

    #[test]
    fn test_get_category_by_name_missing_or_ambiguous() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert_matches!(get_category_by_name(&conn, "Nature"), Err(Error::NotFound(_)));

        create_category(&conn, "Nature").unwrap();
        create_category(&conn, "Nature").unwrap();
        assert_matches!(
            get_category_by_name(&conn, "Nature"),
            Err(Error::MultipleFound(_))
        );
    }

    #[test]
    fn test_list_categories_sorted_by_name() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_category(&conn, "Nature").unwrap();
        create_category(&conn, "Animals").unwrap();
        create_category(&conn, "Mountains").unwrap();

        let names: Vec<_> = list_categories(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Animals", "Mountains", "Nature"]);
        assert_eq!(count_categories(&conn).unwrap(), 3);
    }

    #[test]
    fn test_rename_category() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let category = create_category(&conn, "Nature").unwrap();
        rename_category(&conn, category.id, "Landscapes").unwrap();

        let updated = get_category(&conn, category.id).unwrap().unwrap();
        assert_eq!(updated.name, "Landscapes");

        assert_matches!(
            rename_category(&conn, CategoryId::new(), "Other"),
            Err(Error::NotFound(_))
        );
    }

    #[test]
    fn test_delete_category() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let category = create_category(&conn, "Nature").unwrap();
        let unlinked = delete_category(&conn, category.id).unwrap();
        assert_eq!(unlinked, 0);

        assert!(get_category(&conn, category.id).unwrap().is_none());
        assert!(!category_exists(&conn, category.id).unwrap());
    }

    #[test]
    fn test_delete_category_twice_is_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let category = create_category(&conn, "Nature").unwrap();
        delete_category(&conn, category.id).unwrap();

        assert_matches!(delete_category(&conn, category.id), Err(Error::NotFound(_)));
    }

    #[test]
    fn test_delete_category_unlinks_but_keeps_images() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let nature = create_category(&conn, "Nature").unwrap();
        let sunset = create_test_image(&conn, "Sunset");
        let lake = create_test_image(&conn, "Lake");
        image_categories::add_category(&conn, sunset, nature.id).unwrap();
        image_categories::add_category(&conn, lake, nature.id).unwrap();

        let unlinked = delete_category(&conn, nature.id).unwrap();
        assert_eq!(unlinked, 2);

        assert_eq!(count_images(&conn).unwrap(), 2);
        assert_eq!(image_categories::count_categories_for_image(&conn, sunset).unwrap(), 0);
        assert_eq!(image_categories::count_categories_for_image(&conn, lake).unwrap(), 0);
    }
}
