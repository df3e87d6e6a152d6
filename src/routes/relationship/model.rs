use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// 角色间关系, 所有权按 source 一侧判定
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CharacterRelationship {
    pub id: i64,
    pub source_id: i64,
    pub target_id: i64,
    pub relation_type: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest {
    pub source_id: Option<i64>,
    pub target_id: Option<i64>,
    pub relation_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RelationshipListResponse {
    pub message: String,
    pub relationships: Vec<CharacterRelationship>,
}

#[derive(Debug, Serialize)]
pub struct RelationshipMutationResponse {
    pub message: String,
    pub relationship_id: i64,
}

impl CharacterRelationship {
    pub async fn list_for_character(
        pool: &SqlitePool,
        source_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CharacterRelationship>(
            r#"
            SELECT id, source_id, target_id, relation_type
            FROM character_relationships
            WHERE source_id = ?
            "#,
        )
        .bind(source_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CharacterRelationship>(
            r#"
            SELECT id, source_id, target_id, relation_type
            FROM character_relationships
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(
        pool: &SqlitePool,
        source_id: i64,
        target_id: i64,
        relation_type: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO character_relationships (source_id, target_id, relation_type)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(source_id)
        .bind(target_id)
        .bind(relation_type)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM character_relationships WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
