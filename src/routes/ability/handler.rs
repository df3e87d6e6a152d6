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
    Ability, AbilityListResponse, AbilityMutationResponse, AbilityResetResponse,
    CreateAbilityRequest, UpdateAbilityRequest,
};

#[axum::debug_handler]
pub async fn get_abilities(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<AbilityListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let abilities = Ability::list_for_character(&state.pool, character.id).await?;
    Ok(Json(AbilityListResponse {
        message: "获取能力成功".to_string(),
        abilities,
    }))
}

#[axum::debug_handler]
pub async fn create_ability(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateAbilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("name", present(&req.name)),
        ("description", present(&req.description)),
        ("uses_per_session", req.uses_per_session.is_some()),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let ability_id = Ability::insert(
        &state.pool,
        character.id,
        &req.name.unwrap_or_default(),
        &req.description.unwrap_or_default(),
        req.image_url.as_deref(),
        req.uses_per_session.unwrap_or_default(),
        req.used.unwrap_or(false),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AbilityMutationResponse {
            message: "能力已创建".to_string(),
            ability_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn update_ability(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(ability_id): Path<i64>,
    Json(req): Json<UpdateAbilityRequest>,
) -> Result<Json<AbilityMutationResponse>, AppError> {
    let ability = Ability::find_by_id(&state.pool, ability_id)
        .await?
        .ok_or_else(|| AppError::NotFound("能力不存在".to_string()))?;

    Character::find_owned(&state.pool, ability.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    ability.update(&state.pool, req).await?;
    Ok(Json(AbilityMutationResponse {
        message: "能力已更新".to_string(),
        ability_id: ability.id,
    }))
}

#[axum::debug_handler]
pub async fn delete_ability(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(ability_id): Path<i64>,
) -> Result<Json<AbilityMutationResponse>, AppError> {
    let ability = Ability::find_by_id(&state.pool, ability_id)
        .await?
        .ok_or_else(|| AppError::NotFound("能力不存在".to_string()))?;

    Character::find_owned(&state.pool, ability.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    Ability::delete(&state.pool, ability.id).await?;
    Ok(Json(AbilityMutationResponse {
        message: "能力已删除".to_string(),
        ability_id,
    }))
}

#[axum::debug_handler]
pub async fn reset_abilities(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<AbilityResetResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    Ability::reset_for_character(&state.pool, character.id).await?;
    Ok(Json(AbilityResetResponse {
        message: "能力已全部重置".to_string(),
        character_id,
    }))
}
