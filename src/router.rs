use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware, routes};

/// 组装全部路由: 公开路由与受保护路由分开, 后者套认证中间件
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/revoke_tokens", post(routes::auth::revoke_tokens))
        .route("/ping", get(routes::misc::ping));

    let protected_routes = Router::new()
        .route("/userinfo", get(routes::auth::userinfo))
        // 角色路由, character_id 走查询参数
        .route(
            "/character",
            get(routes::character::get_character)
                .post(routes::character::create_character)
                .put(routes::character::update_character)
                .delete(routes::character::delete_character),
        )
        // 物品栏路由
        .route("/inventory", post(routes::inventory::create_item))
        .route(
            "/inventory/{id}",
            get(routes::inventory::get_inventory)
                .put(routes::inventory::update_item)
                .delete(routes::inventory::delete_item),
        )
        // 能力路由
        .route("/ability", post(routes::ability::create_ability))
        .route(
            "/ability/{id}",
            get(routes::ability::get_abilities)
                .put(routes::ability::update_ability)
                .delete(routes::ability::delete_ability),
        )
        .route(
            "/ability/reset/{character_id}",
            post(routes::ability::reset_abilities),
        )
        // 法术路由
        .route("/spell", post(routes::spell::create_spell))
        .route(
            "/spell/{id}",
            get(routes::spell::get_spells)
                .put(routes::spell::update_spell)
                .delete(routes::spell::delete_spell),
        )
        .route(
            "/spell/reset/{character_id}",
            post(routes::spell::reset_spells),
        )
        .route("/spell/use/{spell_id}", post(routes::spell::use_spell))
        // 状态路由
        .route("/condition", post(routes::condition::create_condition))
        .route(
            "/condition/{id}",
            get(routes::condition::get_conditions).delete(routes::condition::delete_condition),
        )
        // 日志与决定路由
        .route("/journal", post(routes::notes::create_journal_entry))
        .route(
            "/journal/{id}",
            get(routes::notes::get_journal).delete(routes::notes::delete_journal_entry),
        )
        .route("/decision", post(routes::notes::create_decision))
        .route(
            "/decision/{id}",
            get(routes::notes::get_decisions).delete(routes::notes::delete_decision),
        )
        // 关系路由
        .route(
            "/relationship",
            post(routes::relationship::create_relationship),
        )
        .route(
            "/relationship/{id}",
            get(routes::relationship::get_relationships)
                .delete(routes::relationship::delete_relationship),
        )
        // 属性检定
        .route("/roll", get(routes::misc::roll))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let router = Router::new().nest(
        &state.config.api_base_uri.clone(),
        Router::new().merge(public_routes).merge(protected_routes),
    );

    let router = router.layer(axum::middleware::from_fn(middleware::log_errors));

    // 开发模式下放开CORS
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
