//! Category and image repositories.
//!
//! [`CategoryRepository`] and [`ImageRepository`] are the seams the rest of
//! an application talks to. [`SqliteGallery`] implements both over an r2d2
//! pool, checking out one connection per operation.

use std::path::Path;

use gallery_common::{CategoryId, Error, ImageId, Result};
use gallery_db::models::{Category, Image, ImageDraft, ImageFile};
use gallery_db::pool::{get_conn, init_memory_pool, init_pool, DbPool};
use gallery_db::queries::{categories, image_categories, images};

use crate::config::DatabaseConfig;

/// Storage for categories.
pub trait CategoryRepository: Send + Sync {
    /// Create a category with the given name.
    fn create_category(&self, name: &str) -> Result<Category>;

    /// Fetch a category, failing with [`Error::NotFound`] if it is gone.
    fn category(&self, id: CategoryId) -> Result<Category>;

    /// Fetch the single category with this name.
    fn category_by_name(&self, name: &str) -> Result<Category>;

    /// All categories ordered by name.
    fn categories(&self) -> Result<Vec<Category>>;

    fn category_count(&self) -> Result<i64>;

    fn rename_category(&self, id: CategoryId, name: &str) -> Result<Category>;

    /// Delete a category and unlink it from every image.
    ///
    /// Images are never deleted. A second delete of the same category fails
    /// with [`Error::NotFound`].
    fn delete_category(&self, id: CategoryId) -> Result<()>;

    /// Images carrying the category, in link order.
    fn images_in_category(&self, id: CategoryId) -> Result<Vec<Image>>;
}

/// Storage for images and their category memberships.
pub trait ImageRepository: Send + Sync {
    /// Validate the draft and store the image.
    fn create_image(&self, draft: ImageDraft) -> Result<Image>;

    /// Fetch an image, failing with [`Error::NotFound`] if it is gone.
    fn image(&self, id: ImageId) -> Result<Image>;

    /// Fetch the single image with this title.
    fn image_by_title(&self, title: &str) -> Result<Image>;

    /// All images, newest first.
    fn images(&self) -> Result<Vec<Image>>;

    fn image_count(&self) -> Result<i64>;

    /// The stored upload of an image.
    fn image_payload(&self, id: ImageId) -> Result<ImageFile>;

    /// Delete an image and its links; categories are kept.
    fn delete_image(&self, id: ImageId) -> Result<()>;

    /// Link a category; returns `false` when it was already linked.
    fn add_category(&self, image: ImageId, category: CategoryId) -> Result<bool>;

    /// Unlink a category; returns `false` when it was not linked.
    fn remove_category(&self, image: ImageId, category: CategoryId) -> Result<bool>;

    /// Unlink every category; returns the number of links removed.
    fn clear_categories(&self, image: ImageId) -> Result<u64>;

    fn has_category(&self, image: ImageId, category: CategoryId) -> Result<bool>;

    /// Categories of the image in link order.
    fn image_categories(&self, image: ImageId) -> Result<Vec<Category>>;

    fn count_categories(&self, image: ImageId) -> Result<i64>;

    /// The earliest-linked category still attached, if any.
    fn first_category(&self, image: ImageId) -> Result<Option<Category>>;
}

/// SQLite-backed gallery implementing both repositories.
#[derive(Clone)]
pub struct SqliteGallery {
    pool: DbPool,
}

impl SqliteGallery {
    /// Wrap an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database described by `config`.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let pool = init_pool(&config.path.to_string_lossy(), config.pool_size)?;
        tracing::info!(
            "Gallery database ready at {} ({} connections)",
            config.path.display(),
            config.pool_size
        );
        Ok(Self::new(pool))
    }

    /// Open a database file with the default pool size.
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&DatabaseConfig {
            path: path.to_path_buf(),
            ..DatabaseConfig::default()
        })
    }

    /// An isolated in-memory gallery.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(init_memory_pool()?))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn require_image(conn: &rusqlite::Connection, id: ImageId) -> Result<()> {
        if images::image_exists(conn, id)? {
            Ok(())
        } else {
            Err(Error::not_found(format!("image {}", id)))
        }
    }
}

impl std::fmt::Debug for SqliteGallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteGallery")
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}

impl CategoryRepository for SqliteGallery {
    fn create_category(&self, name: &str) -> Result<Category> {
        let conn = get_conn(&self.pool)?;
        categories::create_category(&conn, name)
    }

    fn category(&self, id: CategoryId) -> Result<Category> {
        let conn = get_conn(&self.pool)?;
        categories::get_category(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("category {}", id)))
    }

    fn category_by_name(&self, name: &str) -> Result<Category> {
        let conn = get_conn(&self.pool)?;
        categories::get_category_by_name(&conn, name)
    }

    fn categories(&self) -> Result<Vec<Category>> {
        let conn = get_conn(&self.pool)?;
        categories::list_categories(&conn)
    }

    fn category_count(&self) -> Result<i64> {
        let conn = get_conn(&self.pool)?;
        categories::count_categories(&conn)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> Result<Category> {
        let conn = get_conn(&self.pool)?;
        categories::rename_category(&conn, id, name)?;
        categories::get_category(&conn, id)?
            .ok_or_else(|| Error::not_found(format!("category {}", id)))
    }

    fn delete_category(&self, id: CategoryId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let unlinked = categories::delete_category(&conn, id)?;
        tracing::info!(category_id = %id, unlinked, "Category deleted");
        Ok(())
    }

    fn images_in_category(&self, id: CategoryId) -> Result<Vec<Image>> {
        let conn = get_conn(&self.pool)?;
        if !categories::category_exists(&conn, id)? {
            return Err(Error::not_found(format!("category {}", id)));
        }
        image_categories::list_images_for_category(&conn, id)
    }
}

impl ImageRepository for SqliteGallery {
    fn create_image(&self, draft: ImageDraft) -> Result<Image> {
        let new_image = draft.validate()?;
        let conn = get_conn(&self.pool)?;
        let image = images::insert_image(&conn, &new_image)?;
        tracing::info!(image_id = %image.id, "Image '{}' created", image.title);
        Ok(image)
    }

    fn image(&self, id: ImageId) -> Result<Image> {
        let conn = get_conn(&self.pool)?;
        images::get_image(&conn, id)?.ok_or_else(|| Error::not_found(format!("image {}", id)))
    }

    fn image_by_title(&self, title: &str) -> Result<Image> {
        let conn = get_conn(&self.pool)?;
        images::get_image_by_title(&conn, title)
    }

    fn images(&self) -> Result<Vec<Image>> {
        let conn = get_conn(&self.pool)?;
        images::list_images(&conn)
    }

    fn image_count(&self) -> Result<i64> {
        let conn = get_conn(&self.pool)?;
        images::count_images(&conn)
    }

    fn image_payload(&self, id: ImageId) -> Result<ImageFile> {
        let conn = get_conn(&self.pool)?;
        images::get_image_file(&conn, id)?.ok_or_else(|| Error::not_found(format!("image {}", id)))
    }

    fn delete_image(&self, id: ImageId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        images::delete_image(&conn, id)?;
        tracing::info!(image_id = %id, "Image deleted");
        Ok(())
    }

    fn add_category(&self, image: ImageId, category: CategoryId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        image_categories::add_category(&conn, image, category)
    }

    fn remove_category(&self, image: ImageId, category: CategoryId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::remove_category(&conn, image, category)
    }

    fn clear_categories(&self, image: ImageId) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::clear_categories_for_image(&conn, image)
    }

    fn has_category(&self, image: ImageId, category: CategoryId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::has_category(&conn, image, category)
    }

    fn image_categories(&self, image: ImageId) -> Result<Vec<Category>> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::list_categories_for_image(&conn, image)
    }

    fn count_categories(&self, image: ImageId) -> Result<i64> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::count_categories_for_image(&conn, image)
    }

    fn first_category(&self, image: ImageId) -> Result<Option<Category>> {
        let conn = get_conn(&self.pool)?;
        Self::require_image(&conn, image)?;
        image_categories::first_category_for_image(&conn, image)
    }
}
