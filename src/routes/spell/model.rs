use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Spell {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub spell_type: String,
    pub description: String,
    pub image_url: Option<String>,
    pub uses: i64,
    pub uses_max: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpellRequest {
    pub character_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub spell_type: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub uses: Option<i64>,
    pub uses_max: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSpellRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub spell_type: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub uses: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SpellListResponse {
    pub message: String,
    pub spells: Vec<Spell>,
}

#[derive(Debug, Serialize)]
pub struct SpellMutationResponse {
    pub message: String,
    pub spell_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SpellResetResponse {
    pub message: String,
    pub character_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SpellUseResponse {
    pub message: String,
    pub spell_id: i64,
    pub remaining_uses: i64,
}

impl Spell {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Spell>(
            r#"
            SELECT id, character_id, name, type, description, image_url, uses, uses_max
            FROM spells
            WHERE character_id = ?
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Spell>(
            r#"
            SELECT id, character_id, name, type, description, image_url, uses, uses_max
            FROM spells
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
        name: &str,
        spell_type: &str,
        description: &str,
        image_url: Option<&str>,
        uses: i64,
        uses_max: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO spells (character_id, name, type, description, image_url, uses, uses_max)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(name)
        .bind(spell_type)
        .bind(description)
        .bind(image_url)
        .bind(uses)
        .bind(uses_max)
        .fetch_one(pool)
        .await
    }

    pub async fn update(&self, pool: &SqlitePool, req: UpdateSpellRequest) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE spells
            SET name = ?, type = ?, description = ?, image_url = ?, uses = ?
            WHERE id = ?
            "#,
        )
        .bind(req.name.as_deref().unwrap_or(&self.name))
        .bind(req.spell_type.as_deref().unwrap_or(&self.spell_type))
        .bind(req.description.as_deref().unwrap_or(&self.description))
        .bind(req.image_url.as_deref().or(self.image_url.as_deref()))
        .bind(req.uses.unwrap_or(self.uses))
        .bind(self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM spells WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 消耗一次使用次数, 由调用方保证还有剩余
    pub async fn consume_use(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let remaining = self.uses - 1;
        sqlx::query("UPDATE spells SET uses = ? WHERE id = ?")
            .bind(remaining)
            .bind(self.id)
            .execute(pool)
            .await?;
        Ok(remaining)
    }

    /// 长休后恢复全部法术使用次数
    pub async fn reset_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE spells SET uses = uses_max WHERE character_id = ?")
            .bind(character_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
