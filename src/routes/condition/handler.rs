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
    Condition, ConditionListResponse, ConditionMutationResponse, CreateConditionRequest,
};

#[axum::debug_handler]
pub async fn get_conditions(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<ConditionListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let conditions = Condition::list_for_character(&state.pool, character.id).await?;
    Ok(Json(ConditionListResponse {
        message: "获取状态成功".to_string(),
        conditions,
    }))
}

#[axum::debug_handler]
pub async fn create_condition(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateConditionRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("name", present(&req.name)),
        ("description", present(&req.description)),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let condition_id = Condition::insert(
        &state.pool,
        character.id,
        &req.name.unwrap_or_default(),
        &req.description.unwrap_or_default(),
        req.temporary.unwrap_or(true),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConditionMutationResponse {
            message: "状态已创建".to_string(),
            condition_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn delete_condition(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(condition_id): Path<i64>,
) -> Result<Json<ConditionMutationResponse>, AppError> {
    let condition = Condition::find_by_id(&state.pool, condition_id)
        .await?
        .ok_or_else(|| AppError::NotFound("状态不存在".to_string()))?;

    Character::find_owned(&state.pool, condition.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    Condition::delete(&state.pool, condition.id).await?;
    Ok(Json(ConditionMutationResponse {
        message: "状态已移除".to_string(),
        condition_id,
    }))
}
