use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub character_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Decision {
    pub id: i64,
    pub character_id: i64,
    pub description: String,
    pub impact: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    pub character_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDecisionRequest {
    pub character_id: Option<i64>,
    pub description: Option<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JournalListResponse {
    pub message: String,
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Serialize)]
pub struct JournalMutationResponse {
    pub message: String,
    pub entry_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DecisionListResponse {
    pub message: String,
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Serialize)]
pub struct DecisionMutationResponse {
    pub message: String,
    pub decision_id: i64,
}

impl JournalEntry {
    /// 日志按时间倒序返回, 最新的在前
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, character_id, content, created_at
            FROM journal_entries
            WHERE character_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, character_id, content, created_at
            FROM journal_entries
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
        content: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO journal_entries (character_id, content, created_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM journal_entries WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl Decision {
    pub async fn list_for_character(
        pool: &SqlitePool,
        character_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Decision>(
            r#"
            SELECT id, character_id, description, impact
            FROM decisions
            WHERE character_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Decision>(
            r#"
            SELECT id, character_id, description, impact
            FROM decisions
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
        description: &str,
        impact: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO decisions (character_id, description, impact)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(character_id)
        .bind(description)
        .bind(impact)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM decisions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
