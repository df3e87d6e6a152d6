use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rol_backend::{
    AppState, MIGRATOR, config::Config, router::create_router, routes::auth::model::TokenRecord,
};
use sqlx::Executor;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置数据库连接池
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                Ok(())
            })
        })
        .connect_with(connect_options)
        .await
        .expect("Failed to connect to database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    // 后台定期清扫自然过期的令牌
    {
        let pool = pool.clone();
        let interval = config.sweep_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match TokenRecord::sweep_expired(&pool).await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!("Expired-token sweep revoked {} tokens", n),
                    Err(e) => tracing::error!("Expired-token sweep failed: {:?}", e),
                }
            }
        });
    }

    // 设置应用状态并组装路由
    let state = AppState {
        pool,
        config: config.clone(),
    };
    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
