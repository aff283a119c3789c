//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::item::ItemRef};

use super::ItemCatalog;

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemCatalog for ItemsRepository {
    /// Get item by ID
    async fn get_item(&self, id: i64) -> AppResult<Option<ItemRef>> {
        let item = sqlx::query_as::<_, ItemRef>(
            "SELECT id, owner_id, name, available FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// Ids of every item listed by the owner
    async fn list_item_ids_owned_by(&self, owner_id: i64) -> AppResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM items WHERE owner_id = $1 ORDER BY id")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}
