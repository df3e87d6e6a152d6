use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_character, other_user_token, request, test_app, user_and_token};

async fn add_spell(app: &axum::Router, token: &str, character_id: i64, uses: i64) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/spell",
        Some(token),
        Some(json!({
            "character_id": character_id,
            "name": "Bola de fuego",
            "type": "Ataque",
            "description": "Explosión de fuego",
            "uses": uses,
            "uses_max": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["spell_id"].as_i64().unwrap()
}

#[tokio::test]
async fn spell_uses_deplete_and_reset() {
    let (app, _pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;
    let character_id = create_character(&app, &token).await;
    let spell_id = add_spell(&app, &token, character_id, 2).await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/spell/use/{spell_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_uses"], 1);

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/spell/use/{spell_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining_uses"], 0);

    // 次数用尽后拒绝
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/spell/use/{spell_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 重置恢复到 uses_max
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/spell/reset/{character_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/spell/{character_id}"),
        Some(&token),
        None,
    )
    .await;
    let spells = body["spells"].as_array().unwrap();
    assert_eq!(spells[0]["uses"], 3);
    assert_eq!(spells[0]["type"], "Ataque");
}

#[tokio::test]
async fn spell_create_and_update_validation() {
    let (app, _pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;
    let character_id = create_character(&app, &token).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/spell",
        Some(&token),
        Some(json!({"character_id": character_id, "name": "Incompleto"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("type"));

    let spell_id = add_spell(&app, &token, character_id, 2).await;
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/spell/{spell_id}"),
        Some(&token),
        Some(json!({"name": "Bola de fuego mayor", "uses": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/spell/{character_id}"),
        Some(&token),
        None,
    )
    .await;
    let spell = &body["spells"].as_array().unwrap()[0];
    assert_eq!(spell["name"], "Bola de fuego mayor");
    assert_eq!(spell["uses"], 1);
    assert_eq!(spell["description"], "Explosión de fuego");
}

#[tokio::test]
async fn foreign_spells_are_forbidden() {
    let (app, _pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;
    let character_id = create_character(&app, &token).await;
    let spell_id = add_spell(&app, &token, character_id, 2).await;

    let other = other_user_token(&app).await;
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/spell/use/{spell_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/spell/{character_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, "POST", "/api/spell/use/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
