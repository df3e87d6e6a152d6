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
    CreateDecisionRequest, CreateJournalEntryRequest, Decision, DecisionListResponse,
    DecisionMutationResponse, JournalEntry, JournalListResponse, JournalMutationResponse,
};

#[axum::debug_handler]
pub async fn get_journal(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<JournalListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let entries = JournalEntry::list_for_character(&state.pool, character.id).await?;
    Ok(Json(JournalListResponse {
        message: "获取日志成功".to_string(),
        entries,
    }))
}

#[axum::debug_handler]
pub async fn create_journal_entry(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateJournalEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("content", present(&req.content)),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let entry_id =
        JournalEntry::insert(&state.pool, character.id, &req.content.unwrap_or_default()).await?;

    Ok((
        StatusCode::CREATED,
        Json(JournalMutationResponse {
            message: "日志已创建".to_string(),
            entry_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn delete_journal_entry(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<Json<JournalMutationResponse>, AppError> {
    let entry = JournalEntry::find_by_id(&state.pool, entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound("日志不存在".to_string()))?;

    Character::find_owned(&state.pool, entry.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    JournalEntry::delete(&state.pool, entry.id).await?;
    Ok(Json(JournalMutationResponse {
        message: "日志已删除".to_string(),
        entry_id,
    }))
}

#[axum::debug_handler]
pub async fn get_decisions(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<DecisionListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let decisions = Decision::list_for_character(&state.pool, character.id).await?;
    Ok(Json(DecisionListResponse {
        message: "获取决定成功".to_string(),
        decisions,
    }))
}

#[axum::debug_handler]
pub async fn create_decision(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateDecisionRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("description", present(&req.description)),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let decision_id = Decision::insert(
        &state.pool,
        character.id,
        &req.description.unwrap_or_default(),
        req.impact.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DecisionMutationResponse {
            message: "决定已记录".to_string(),
            decision_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn delete_decision(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(decision_id): Path<i64>,
) -> Result<Json<DecisionMutationResponse>, AppError> {
    let decision = Decision::find_by_id(&state.pool, decision_id)
        .await?
        .ok_or_else(|| AppError::NotFound("决定不存在".to_string()))?;

    Character::find_owned(&state.pool, decision.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    Decision::delete(&state.pool, decision.id).await?;
    Ok(Json(DecisionMutationResponse {
        message: "决定已删除".to_string(),
        decision_id,
    }))
}
