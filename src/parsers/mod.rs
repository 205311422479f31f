pub mod bookmarks;
pub mod browser;
pub mod normalize;
pub mod queries;
pub mod sqlite_db;
