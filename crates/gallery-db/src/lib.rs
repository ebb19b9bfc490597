//! Gallery-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for gallery using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use gallery_db::pool::{init_pool, get_conn};
//! use gallery_db::queries::categories;
//!
//! let pool = init_pool("/var/lib/gallery/gallery.db", 4).unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let category = categories::create_category(&conn, "Nature").unwrap();
//! println!("Created category: {}", category);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
