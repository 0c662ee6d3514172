use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use maintenance_desk::api::{self, ApiDoc};
use maintenance_desk::auth::JwtUtils;
use maintenance_desk::configuration::Settings;
use maintenance_desk::db::init_db;
use maintenance_desk::migration::{Migrator, MigratorTrait};
use maintenance_desk::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "maintenance_desk".into(),
        "info,sqlx=warn".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber)?;

    info!("애플리케이션 시작 중...");

    let settings = Settings::from_env()?;
    info!("환경 변수 로드 완료");

    let db = init_db(&settings).await?;
    info!("데이터베이스 마이그레이션 실행 중...");
    Migrator::up(&db, None).await?;
    info!("마이그레이션 완료");

    let db_data = Data::new(db);
    let jwt_data = Data::new(JwtUtils::new(settings.jwt_secret.clone()));
    let openapi = ApiDoc::openapi();

    info!("서버 시작 중: http://{}:{}", settings.host, settings.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(db_data.clone())
            .app_data(jwt_data.clone())
            .configure(api::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
        .bind((settings.host.as_str(), settings.port))?
        .run()
        .await?;

    Ok(())
}
