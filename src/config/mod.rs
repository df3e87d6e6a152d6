use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub refresh_expiration_secs: u64,
    pub sweep_interval_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let jwt_expiration = expiration_hours("JWT_EXPIRATION", 12);
        let refresh_expiration = expiration_hours("REFRESH_EXPIRATION", 168);
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            refresh_expiration_secs: refresh_expiration * 3600,
            sweep_interval_secs: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn refresh_expiration(&self) -> Duration {
        Duration::from_secs(self.refresh_expiration_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// 读取形如 "12h" 或 "12" 的小时数配置, 解析失败时告警并退回默认值
fn expiration_hours(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => parse_hours(&raw).unwrap_or_else(|| {
            tracing::warn!("Invalid {} value '{}', falling back to {}h", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_hours(raw: &str) -> Option<u64> {
    raw.strip_suffix('h').unwrap_or(raw).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_hours;

    #[test]
    fn duration_strings_are_hours_only() {
        assert_eq!(parse_hours("12h"), Some(12));
        assert_eq!(parse_hours("168"), Some(168));
        // 其他单位不被支持, 交给调用方退回默认值
        assert_eq!(parse_hours("30m"), None);
        assert_eq!(parse_hours(""), None);
    }
}
