use actix_web::{get, HttpResponse, Responder};

#[utoipa::path(
    get,
    path = "/health-check",
    summary = "헬스 체크",
    responses(
        (status = 200, description = "서버가 정상 동작 중", body = String)
    ),
    tag = "health check",
)]
#[get("/health-check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn health_check_needs_no_token() {
        let app = test::init_service(App::new().service(health_check)).await;
        let req = test::TestRequest::get().uri("/health-check").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "OK");
    }
}
