//! Category repository contract and SQLite implementation.

use crate::model::category::Category;
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository interface for the fixed category list.
pub trait CategoryRepository {
    /// Lists all categories ordered by id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Finds one category by its exact, case-sensitive name.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, category_name FROM categories ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, category_name FROM categories WHERE category_name = ?1;",
                [name],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("category_name")?,
    })
}
