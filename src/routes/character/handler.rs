use axum::{
    Extension,
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    utils::{Claims, present, require_fields},
};

use super::model::{
    Character, CharacterGetResponse, CharacterMutationResponse, CharacterQuery,
    CreateCharacterRequest, UpdateCharacterRequest,
};

#[axum::debug_handler]
pub async fn get_character(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Result<Json<CharacterGetResponse>, AppError> {
    match query.character_id {
        Some(character_id) => {
            let character = Character::find_owned(&state.pool, character_id, claims.sub)
                .await?
                .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;
            let detail = character.detail(&state.pool).await?;
            Ok(Json(CharacterGetResponse {
                message: "获取角色成功".to_string(),
                character: Some(detail),
                characters: None,
            }))
        }
        None => {
            let characters = Character::list_by_user(&state.pool, claims.sub).await?;
            let mut details = Vec::with_capacity(characters.len());
            for character in characters {
                details.push(character.detail(&state.pool).await?);
            }
            Ok(Json(CharacterGetResponse {
                message: "获取角色列表成功".to_string(),
                character: None,
                characters: Some(details),
            }))
        }
    }
}

#[axum::debug_handler]
pub async fn create_character(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("name", present(&req.name)),
        ("race", present(&req.race)),
        ("goal", present(&req.goal)),
        ("background", present(&req.background)),
    ])?;

    let character_id = Character::create(&state.pool, claims.sub, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CharacterMutationResponse {
            message: "角色已创建".to_string(),
            character_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn update_character(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
    Json(req): Json<UpdateCharacterRequest>,
) -> Result<Json<CharacterMutationResponse>, AppError> {
    let character_id = query
        .character_id
        .ok_or_else(|| AppError::Validation("缺少 character_id 参数".to_string()))?;

    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    character.update(&state.pool, req).await?;
    Ok(Json(CharacterMutationResponse {
        message: "角色已更新".to_string(),
        character_id,
    }))
}

#[axum::debug_handler]
pub async fn delete_character(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Result<Json<CharacterMutationResponse>, AppError> {
    let character_id = query
        .character_id
        .ok_or_else(|| AppError::Validation("缺少 character_id 参数".to_string()))?;

    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    Character::delete_cascade(&state.pool, character.id).await?;
    Ok(Json(CharacterMutationResponse {
        message: "角色已删除".to_string(),
        character_id,
    }))
}
