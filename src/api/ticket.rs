use actix_web::{get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::model::global_error::AppError;
use crate::model::ticket::{
    OverdueCheckResponse, TicketCreateRequest, TicketLogResponse, TicketResponse, TicketUpdateRequest,
};
use crate::workflow::{self, audit};

#[utoipa::path(
    post,
    path = "/api/tickets",
    summary = "티켓 등록",
    request_body = TicketCreateRequest,
    responses(
        (status = 201, description = "티켓 등록 성공", body = TicketResponse),
        (status = 400, description = "잘못된 섹션/시설 또는 유효성 검증 실패"),
    ),
    tag = "tickets",
)]
#[post("/tickets")]
pub async fn create_ticket(
    body: web::Json<TicketCreateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let ticket = workflow::create_ticket(db.get_ref(), body.into_inner().into(), *auth_user).await?;

    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    summary = "티켓 상세 조회",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    responses(
        (status = 200, description = "조회 성공", body = TicketResponse),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "tickets",
)]
#[get("/tickets/{id}")]
pub async fn get_ticket(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ticket = workflow::find_ticket(db.get_ref(), path.into_inner()).await?;
    let comments = workflow::comments_count(db.get_ref(), ticket.id).await?;

    Ok(HttpResponse::Ok().json(TicketResponse::from(ticket).with_comments_count(comments)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/number/{ticket_no}",
    summary = "티켓 번호로 조회",
    params(
        ("ticket_no" = String, Path, description = "티켓 번호 (TKT-000001)"),
    ),
    responses(
        (status = 200, description = "조회 성공", body = TicketResponse),
        (status = 400, description = "번호 형식 오류"),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "tickets",
)]
#[get("/tickets/number/{ticket_no}")]
pub async fn get_ticket_by_number(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ticket = workflow::find_ticket_by_number(db.get_ref(), &path.into_inner()).await?;
    let comments = workflow::comments_count(db.get_ref(), ticket.id).await?;

    Ok(HttpResponse::Ok().json(TicketResponse::from(ticket).with_comments_count(comments)))
}

#[utoipa::path(
    patch,
    path = "/api/tickets/{id}",
    summary = "티켓 상태/담당자 변경",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    request_body = TicketUpdateRequest,
    responses(
        (status = 200, description = "변경 성공", body = TicketResponse),
        (status = 400, description = "섹션 불일치, 종료된 티켓 배정 등"),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "tickets",
)]
#[patch("/tickets/{id}")]
pub async fn update_ticket(
    path: web::Path<i32>,
    body: web::Json<TicketUpdateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let ticket = workflow::update_ticket(
        db.get_ref(),
        path.into_inner(),
        body.into_inner().into(),
        *auth_user,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TicketResponse::from(ticket)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}/logs",
    summary = "티켓 감사 로그 조회",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    responses(
        (status = 200, description = "조회 성공", body = Vec<TicketLogResponse>),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "tickets",
)]
#[get("/tickets/{id}/logs")]
pub async fn list_ticket_logs(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ticket = workflow::find_ticket(db.get_ref(), path.into_inner()).await?;
    let logs = audit::ticket_logs(db.get_ref(), ticket.id).await?;

    let response: Vec<TicketLogResponse> = logs.into_iter().map(TicketLogResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/overdue-check",
    summary = "지연 티켓 점검",
    params(
        ("id" = i32, Path, description = "티켓 ID"),
    ),
    responses(
        (status = 200, description = "점검 완료", body = OverdueCheckResponse),
        (status = 404, description = "티켓 없음"),
    ),
    tag = "tickets",
)]
#[post("/tickets/{id}/overdue-check")]
pub async fn check_overdue(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let ticket_id = path.into_inner();
    let transitioned = workflow::mark_overdue_if_needed(db.get_ref(), ticket_id).await?;
    let ticket = workflow::find_ticket(db.get_ref(), ticket_id).await?;

    Ok(HttpResponse::Ok().json(OverdueCheckResponse {
        transitioned,
        ticket: TicketResponse::from(ticket),
    }))
}
