use anyhow::Context;
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
}

impl Settings {
    /// `.env` 파일과 환경 변수에서 설정을 읽는다.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL 환경 변수가 설정되어야 합니다")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET 환경 변수가 설정되어야 합니다")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 8080)?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 10)?;

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            db_max_connections,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} 값을 해석할 수 없습니다: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_or;

    #[test]
    fn parse_or_falls_back_to_default_when_unset() {
        let port: u16 = parse_or("MAINTENANCE_DESK_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }
}
