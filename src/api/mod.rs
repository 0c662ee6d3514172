mod auth;
mod catalog;
mod comment;
mod feedback;
mod health_check;
mod ticket;

use actix_web::web::{self, scope};
use utoipa::OpenApi;

use crate::auth::AuthMiddleware;
use crate::entity::facility::FacilityType;
use crate::entity::ticket::TicketStatus;
use crate::entity::user::Role;
use crate::model::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::model::catalog::{FacilityCreateRequest, FacilityResponse, SectionCreateRequest, SectionResponse};
use crate::model::global_error::{ErrorResponse, ValidationFieldError};
use crate::model::ticket::{
    CommentCreateRequest, CommentResponse, FeedbackCreateRequest, FeedbackResponse, OverdueCheckResponse,
    TicketCreateRequest, TicketLogResponse, TicketResponse, TicketUpdateRequest,
};

pub use crate::api::auth::{get_me, login, register};
pub use crate::api::catalog::{create_facility, create_section, list_facilities, list_sections};
pub use crate::api::comment::{create_comment, list_comments};
pub use crate::api::feedback::create_feedback;
pub use crate::api::ticket::{
    check_overdue, create_ticket, get_ticket, get_ticket_by_number, list_ticket_logs, update_ticket,
};

/// 공개 라우트와 `/api` 아래 인증 라우트를 등록한다.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check::health_check)
        .service(register)
        .service(login)
        .service(
            scope("/api")
                .wrap(AuthMiddleware)
                .service(get_me)
                .service(create_section)
                .service(list_sections)
                .service(create_facility)
                .service(list_facilities)
                .service(create_ticket)
                .service(get_ticket_by_number)
                .service(get_ticket)
                .service(update_ticket)
                .service(list_ticket_logs)
                .service(check_overdue)
                .service(create_comment)
                .service(list_comments)
                .service(create_feedback),
        );
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check::health_check,
        auth::register,
        auth::login,
        auth::get_me,
        catalog::create_section,
        catalog::list_sections,
        catalog::create_facility,
        catalog::list_facilities,
        ticket::create_ticket,
        ticket::get_ticket,
        ticket::get_ticket_by_number,
        ticket::update_ticket,
        ticket::list_ticket_logs,
        ticket::check_overdue,
        comment::create_comment,
        comment::list_comments,
        feedback::create_feedback,
    ),
    components(schemas(
        ErrorResponse,
        ValidationFieldError,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        Role,
        SectionCreateRequest,
        SectionResponse,
        FacilityCreateRequest,
        FacilityResponse,
        FacilityType,
        TicketStatus,
        TicketCreateRequest,
        TicketUpdateRequest,
        TicketResponse,
        TicketLogResponse,
        OverdueCheckResponse,
        CommentCreateRequest,
        CommentResponse,
        FeedbackCreateRequest,
        FeedbackResponse,
    )),
    tags(
        (name = "auth", description = "회원 가입/로그인"),
        (name = "catalog", description = "섹션/시설 관리"),
        (name = "tickets", description = "티켓 워크플로"),
        (name = "comments", description = "티켓 댓글"),
        (name = "feedback", description = "만족도 평가"),
    ),
)]
pub struct ApiDoc;
