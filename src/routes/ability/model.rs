use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Ability {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub uses_per_session: i64,
    pub used: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateAbilityRequest {
    pub character_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub uses_per_session: Option<i64>,
    pub used: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAbilityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub uses_per_session: Option<i64>,
    pub used: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AbilityListResponse {
    pub message: String,
    pub abilities: Vec<Ability>,
}

#[derive(Debug, Serialize)]
pub struct AbilityMutationResponse {
    pub message: String,
    pub ability_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AbilityResetResponse {
    pub message: String,
    pub character_id: i64,
}

impl Ability {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ability>(
            r#"
            SELECT id, character_id, name, description, image_url, uses_per_session, used
            FROM abilities
            WHERE character_id = ?
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ability>(
            r#"
            SELECT id, character_id, name, description, image_url, uses_per_session, used
            FROM abilities
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
        description: &str,
        image_url: Option<&str>,
        uses_per_session: i64,
        used: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO abilities (character_id, name, description, image_url, uses_per_session, used)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(name)
        .bind(description)
        .bind(image_url)
        .bind(uses_per_session)
        .bind(used)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        &self,
        pool: &SqlitePool,
        req: UpdateAbilityRequest,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE abilities
            SET name = ?, description = ?, image_url = ?, uses_per_session = ?, used = ?
            WHERE id = ?
            "#,
        )
        .bind(req.name.as_deref().unwrap_or(&self.name))
        .bind(req.description.as_deref().unwrap_or(&self.description))
        .bind(req.image_url.as_deref().or(self.image_url.as_deref()))
        .bind(req.uses_per_session.unwrap_or(self.uses_per_session))
        .bind(req.used.unwrap_or(self.used))
        .bind(self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM abilities WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 会话结束后重置全部能力为未使用
    pub async fn reset_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE abilities SET used = 0 WHERE character_id = ?")
            .bind(character_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
