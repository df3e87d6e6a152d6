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
    CreateItemRequest, InventoryItem, InventoryListResponse, ItemMutationResponse,
    UpdateItemRequest,
};

#[axum::debug_handler]
pub async fn get_inventory(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(character_id): Path<i64>,
) -> Result<Json<InventoryListResponse>, AppError> {
    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let items = InventoryItem::list_for_character(&state.pool, character.id).await?;
    Ok(Json(InventoryListResponse {
        message: "获取物品栏成功".to_string(),
        items,
    }))
}

#[axum::debug_handler]
pub async fn create_item(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("character_id", req.character_id.is_some()),
        ("item", present(&req.item)),
        ("description", present(&req.description)),
    ])?;

    let character =
        Character::find_owned(&state.pool, req.character_id.unwrap_or_default(), claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let item_id = InventoryItem::insert(
        &state.pool,
        character.id,
        &req.item.unwrap_or_default(),
        &req.description.unwrap_or_default(),
        req.image_url.as_deref(),
        req.magical.unwrap_or(false),
        req.notes.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemMutationResponse {
            message: "已添加物品".to_string(),
            item_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn update_item(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemMutationResponse>, AppError> {
    let item = InventoryItem::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("物品不存在".to_string()))?;

    // 物品存在但所属角色不归当前用户, 返回 403
    Character::find_owned(&state.pool, item.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    item.update(&state.pool, req).await?;
    Ok(Json(ItemMutationResponse {
        message: "物品已更新".to_string(),
        item_id: item.id,
    }))
}

#[axum::debug_handler]
pub async fn delete_item(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<ItemMutationResponse>, AppError> {
    let item = InventoryItem::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("物品不存在".to_string()))?;

    Character::find_owned(&state.pool, item.character_id, claims.sub)
        .await?
        .ok_or(AppError::Forbidden)?;

    InventoryItem::delete(&state.pool, item.id).await?;
    Ok(Json(ItemMutationResponse {
        message: "物品已删除".to_string(),
        item_id,
    }))
}
