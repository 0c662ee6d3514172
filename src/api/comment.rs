use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::model::global_error::AppError;
use crate::model::ticket::{CommentCreateRequest, CommentResponse};
use crate::workflow;

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/comments",
    summary = "댓글 작성",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    request_body = CommentCreateRequest,
    responses(
        (status = 201, description = "댓글 작성 성공", body = CommentResponse),
        (status = 400, description = "유효성 검증 실패"),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "comments",
)]
#[post("/tickets/{id}/comments")]
pub async fn create_comment(
    path: web::Path<i32>,
    body: web::Json<CommentCreateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let comment =
        workflow::create_comment(db.get_ref(), path.into_inner(), body.into_inner().text, *auth_user).await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}/comments",
    summary = "댓글 목록 조회",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    responses(
        (status = 200, description = "조회 성공", body = Vec<CommentResponse>),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "comments",
)]
#[get("/tickets/{id}/comments")]
pub async fn list_comments(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let comments = workflow::list_comments(db.get_ref(), path.into_inner()).await?;

    let response: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}
