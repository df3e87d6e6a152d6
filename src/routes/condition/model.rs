use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Condition {
    pub id: i64,
    pub character_id: i64,
    pub name: String,
    pub description: String,
    pub temporary: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateConditionRequest {
    pub character_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub temporary: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ConditionListResponse {
    pub message: String,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Serialize)]
pub struct ConditionMutationResponse {
    pub message: String,
    pub condition_id: i64,
}

impl Condition {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Condition>(
            r#"
            SELECT id, character_id, name, description, temporary
            FROM conditions
            WHERE character_id = ?
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Condition>(
            r#"
            SELECT id, character_id, name, description, temporary
            FROM conditions
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
        temporary: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO conditions (character_id, name, description, temporary)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(name)
        .bind(description)
        .bind(temporary)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM conditions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
