use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::{info, instrument};

use crate::configuration::Settings;

#[instrument(skip(settings))]
pub async fn init_db(settings: &Settings) -> anyhow::Result<DatabaseConnection> {
    info!("데이터베이스 연결 설정 중...");

    let mut options = ConnectOptions::new(settings.database_url.clone());
    options
        .max_connections(settings.db_max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    info!("데이터베이스에 연결 시도 중...");
    let db = Database::connect(options).await?;
    info!("데이터베이스 연결 완료");

    Ok(db)
}
