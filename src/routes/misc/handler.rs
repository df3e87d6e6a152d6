use axum::{
    Extension,
    extract::{Json, Query, State},
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::AppError,
    routes::character::model::{Character, Stat},
    utils::Claims,
};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RollQuery {
    pub character_id: Option<i64>,
    pub stat: Option<String>,
    pub difficulty: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RollResult {
    pub stat: String,
    pub base_roll: i64,
    pub modifier: i64,
    pub total: i64,
    pub difficulty: i64,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct RollResponse {
    pub message: String,
    pub result: RollResult,
}

#[axum::debug_handler]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

/// 属性检定: d20 加属性修正对抗难度
#[axum::debug_handler]
pub async fn roll(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(query): Query<RollQuery>,
) -> Result<Json<RollResponse>, AppError> {
    let (Some(character_id), Some(stat_name), Some(difficulty)) =
        (query.character_id, query.stat, query.difficulty)
    else {
        return Err(AppError::Validation(
            "参数 character_id, stat, difficulty 必填".to_string(),
        ));
    };

    let character = Character::find_owned(&state.pool, character_id, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("角色不存在".to_string()))?;

    let stat_name = stat_name.to_uppercase();
    let stat = Stat::find_by_name(&state.pool, character.id, &stat_name)
        .await?
        .ok_or_else(|| AppError::Validation(format!("角色没有属性 \"{stat_name}\"")))?;

    let base_roll: i64 = rand::thread_rng().gen_range(1..=20);
    let total = base_roll + stat.value;

    Ok(Json(RollResponse {
        message: "检定完成".to_string(),
        result: RollResult {
            stat: stat_name,
            base_roll,
            modifier: stat.value,
            total,
            difficulty,
            success: total >= difficulty,
        },
    }))
}
