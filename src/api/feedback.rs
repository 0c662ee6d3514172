use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::model::global_error::AppError;
use crate::model::ticket::{FeedbackCreateRequest, FeedbackResponse};
use crate::workflow;

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/feedback",
    summary = "피드백 등록",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    request_body = FeedbackCreateRequest,
    responses(
        (status = 201, description = "피드백 등록 성공", body = FeedbackResponse),
        (status = 400, description = "평점 범위 오류"),
        (status = 403, description = "티켓 등록자가 아님"),
        (status = 404, description = "티켓 없음"),
        (status = 409, description = "이미 피드백이 존재함"),
    ),
    tag = "feedback",
)]
#[post("/tickets/{id}/feedback")]
pub async fn create_feedback(
    path: web::Path<i32>,
    body: web::Json<FeedbackCreateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let feedback =
        workflow::create_feedback(db.get_ref(), path.into_inner(), body.into_inner().into(), *auth_user).await?;

    Ok(HttpResponse::Created().json(FeedbackResponse::from(feedback)))
}
