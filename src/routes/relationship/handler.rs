use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    routes::character::model::Character,
    utils::{Claims, present, require_fields},
};

use super::model::{
    CharacterRelationship, CreateRelationshipRequest, RelationshipListResponse,
    RelationshipMutationResponse,
};

#[axum::debug_handler]
pub async fn get_relationships(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<RelationshipListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let relationships =
        CharacterRelationship::list_for_character(&state.pool, character.id).await?;
    Ok(Json(RelationshipListResponse {
        message: "获取关系成功".to_string(),
        relationships,
    }))
}

#[axum::debug_handler]
pub async fn create_relationship(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateRelationshipRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("source_id", req.source_id.is_some()),
        ("target_id", req.target_id.is_some()),
        ("relation_type", present(&req.relation_type)),
    ])?;

    // 只校验 source 一侧的所有权, target 可以是任意角色
    let source = Character::find_owned(&state.pool, req.source_id.unwrap_or_default(), claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    let relationship_id = CharacterRelationship::insert(
        &state.pool,
        source.id,
        req.target_id.unwrap_or_default(),
        &req.relation_type.unwrap_or_default(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RelationshipMutationResponse {
            message: "关系已创建".to_string(),
            relationship_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn delete_relationship(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(relationship_id): Path<i64>,
) -> Result<Json<RelationshipMutationResponse>, AppError> {
    let relationship = CharacterRelationship::find_by_id(&state.pool, relationship_id)
        .await?
        .ok_or_else(|| AppError::NotFound("关系不存在".to_string()))?;

    Character::find_owned(&state.pool, relationship.source_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    CharacterRelationship::delete(&state.pool, relationship.id).await?;
    Ok(Json(RelationshipMutationResponse {
        message: "关系已删除".to_string(),
        relationship_id,
    }))
}
