//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MenuItem, MenuItemNew, MenuItemUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let rid = parse_record_id(TABLE, id);
        let item: Option<MenuItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// All menu items offered by a homestay
    pub async fn find_by_homestay(&self, homestay: &RecordId) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE homestay = $homestay ORDER BY name")
            .bind(("homestay", homestay.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a menu item
    pub async fn create(&self, data: MenuItemNew) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item (MERGE semantics)
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let rid = parse_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $m MERGE $data RETURN AFTER")
            .bind(("m", rid))
            .bind(("data", data))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id);
        let _: Option<MenuItem> = self.base.db().delete(rid).await?;
        Ok(true)
    }
}
