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
    CreateSpellRequest, Spell, SpellListResponse, SpellMutationResponse, SpellResetResponse,
    SpellUseResponse, UpdateSpellRequest,
};

#[axum::debug_handler]
pub async fn get_spells(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<SpellListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let spells = Spell::list_for_character(&state.pool, character.id).await?;
    Ok(Json(SpellListResponse {
        message: "获取法术成功".to_string(),
        spells,
    }))
}

#[axum::debug_handler]
pub async fn create_spell(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateSpellRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("name", present(&req.name)),
        ("type", present(&req.spell_type)),
        ("description", present(&req.description)),
        ("uses", req.uses.is_some()),
        ("uses_max", req.uses_max.is_some()),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let spell_id = Spell::insert(
        &state.pool,
        character.id,
        &req.name.unwrap_or_default(),
        &req.spell_type.unwrap_or_default(),
        &req.description.unwrap_or_default(),
        req.image_url.as_deref(),
        req.uses.unwrap_or_default(),
        req.uses_max.unwrap_or(1),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SpellMutationResponse {
            message: "法术已创建".to_string(),
            spell_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn update_spell(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(spell_id): Path<i64>,
    Json(req): Json<UpdateSpellRequest>,
) -> Result<Json<SpellMutationResponse>, AppError> {
    let spell = Spell::find_by_id(&state.pool, spell_id)
        .await?
        .ok_or_else(|| AppError::NotFound("法术不存在".to_string()))?;

    Character::find_owned(&state.pool, spell.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    spell.update(&state.pool, req).await?;
    Ok(Json(SpellMutationResponse {
        message: "法术已更新".to_string(),
        spell_id: spell.id,
    }))
}

#[axum::debug_handler]
pub async fn delete_spell(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(spell_id): Path<i64>,
) -> Result<Json<SpellMutationResponse>, AppError> {
    let spell = Spell::find_by_id(&state.pool, spell_id)
        .await?
        .ok_or_else(|| AppError::NotFound("法术不存在".to_string()))?;

    Character::find_owned(&state.pool, spell.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    Spell::delete(&state.pool, spell.id).await?;
    Ok(Json(SpellMutationResponse {
        message: "法术已删除".to_string(),
        spell_id,
    }))
}

#[axum::debug_handler]
pub async fn use_spell(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(spell_id): Path<i64>,
) -> Result<Json<SpellUseResponse>, AppError> {
    let spell = Spell::find_by_id(&state.pool, spell_id)
        .await?
        .ok_or_else(|| AppError::NotFound("法术不存在".to_string()))?;

    Character::find_owned(&state.pool, spell.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    if spell.uses <= 0 {
        return Err(AppError::Validation("该法术已没有剩余使用次数".to_string()));
    }

    let remaining_uses = spell.consume_use(&state.pool).await?;
    Ok(Json(SpellUseResponse {
        message: "法术已使用".to_string(),
        spell_id: spell.id,
        remaining_uses,
    }))
}

#[axum::debug_handler]
pub async fn reset_spells(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<SpellResetResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    Spell::reset_for_character(&state.pool, character.id).await?;
    Ok(Json(SpellResetResponse {
        message: "法术使用次数已恢复".to_string(),
        character_id,
    }))
}
