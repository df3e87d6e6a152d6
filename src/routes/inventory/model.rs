use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub character_id: i64,
    pub item: String,
    pub description: String,
    pub image_url: Option<String>,
    pub magical: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub character_id: Option<i64>,
    pub item: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub magical: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub item: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub magical: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryListResponse {
    pub message: String,
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Serialize)]
pub struct ItemMutationResponse {
    pub message: String,
    pub item_id: i64,
}

impl InventoryItem {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, character_id, item, description, image_url, magical, notes
            FROM inventory_items
            WHERE character_id = ?
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, character_id, item, description, image_url, magical, notes
            FROM inventory_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(
        pool: &SqlitePool,
        character_id: i64,
        item: &str,
        description: &str,
        image_url: Option<&str>,
        magical: bool,
        notes: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO inventory_items (character_id, item, description, image_url, magical, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(item)
        .bind(description)
        .bind(image_url)
        .bind(magical)
        .bind(notes)
        .fetch_one(pool)
        .await
    }

    /// 按请求中出现的字段做部分更新
    pub async fn update(&self, pool: &SqlitePool, req: UpdateItemRequest) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE inventory_items
            SET item = ?, description = ?, image_url = ?, magical = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(req.item.as_deref().unwrap_or(&self.item))
        .bind(req.description.as_deref().unwrap_or(&self.description))
        .bind(req.image_url.as_deref().or(self.image_url.as_deref()))
        .bind(req.magical.unwrap_or(self.magical))
        .bind(req.notes.as_deref().or(self.notes.as_deref()))
        .bind(self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM inventory_items WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
