use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::utils::{Claims, hash_password, verify_password};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub last_logout: DateTime<Utc>,
}

/// 令牌账本行, 每个签发的访问令牌一行. 只翻转 revoked, 从不删除
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TokenRecord {
    pub jti: String,
    pub user_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub permanent: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login_name: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub no_expire: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeTokensRequest {
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevokeTokensResponse {
    pub message: String,
    pub revoked_total: i64,
    pub revoked_persistent: i64,
    pub revoked_temporal: i64,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RevokedCounts {
    pub total: i64,
    pub persistent: i64,
    pub temporal: i64,
}

impl User {
    /// 注册新用户. 用户名/邮箱的查重是先查后插, 并发下以唯一约束兜底
    pub async fn register(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, AppError> {
        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::DuplicateIdentity("用户名已存在".to_string()));
        }

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::DuplicateIdentity("邮箱已被注册".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, last_login, last_logout)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// 按用户名或邮箱查找, 单一标识字段两者皆可
    pub async fn find_by_login(
        pool: &SqlitePool,
        identifier: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login, last_logout
            FROM users
            WHERE username = ?1 OR email = ?1
            "#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login, last_logout
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub fn verify_login(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify_password(password, &self.password_hash)
    }

    pub async fn touch_last_login(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 记录全局登出时刻, 早于该时刻签发的令牌一律拒绝
    pub async fn stamp_last_logout(
        executor: impl SqliteExecutor<'_>,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_logout = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

impl TokenRecord {
    /// 写入账本行, 与签发在同一事务中, 写入失败则登录失败
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        claims: &Claims,
        permanent: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO tokens (jti, user_id, issued_at, expires_at, revoked, permanent)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&claims.jti)
        .bind(claims.sub)
        .bind(claims.issued_at)
        .bind(claims.expires_at())
        .bind(permanent)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_jti(pool: &SqlitePool, jti: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TokenRecord>(
            r#"
            SELECT jti, user_id, issued_at, expires_at, revoked, permanent
            FROM tokens
            WHERE jti = ?
            "#,
        )
        .bind(jti)
        .fetch_optional(pool)
        .await
    }

    /// 惰性回收: 发现已过期时直接标记吊销. 重复执行无副作用
    pub async fn mark_revoked(pool: &SqlitePool, jti: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tokens SET revoked = 1 WHERE jti = ?")
            .bind(jti)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 吊销某用户的全部未吊销令牌, 按永久/非永久分别计数.
    /// 必须在调用方的事务内执行, 全部成功或全部回滚
    pub async fn revoke_all_for_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<RevokedCounts, sqlx::Error> {
        let rows: Vec<(bool, i64)> = sqlx::query_as(
            r#"
            SELECT permanent, COUNT(*)
            FROM tokens
            WHERE user_id = ? AND revoked = 0
            GROUP BY permanent
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut counts = RevokedCounts::default();
        for (permanent, n) in rows {
            counts.total += n;
            if permanent {
                counts.persistent += n;
            } else {
                counts.temporal += n;
            }
        }

        sqlx::query("UPDATE tokens SET revoked = 1 WHERE user_id = ? AND revoked = 0")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(counts)
    }

    /// 批量回收自然过期的令牌. 幂等, 已清扫过则无行可改
    pub async fn sweep_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tokens
            SET revoked = 1
            WHERE revoked = 0 AND permanent = 0 AND expires_at < ?
            "#,
        )
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
