use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// 에러의 큰 분류. 호출자는 이 값으로 400/403/404/409 를 구분한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    PermissionDenied,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 400 BAD REQUEST
    ValidationError,
    DuplicateAccountEmail,
    InvalidEmailPwd,
    InvalidSection,
    InvalidFacility,
    InvalidAssignee,
    NotATechnician,
    TechnicianSectionMismatch,
    TicketAlreadyClosed,
    InvalidStatusTransition,
    InvalidRating,

    // 401 UNAUTHORIZED
    AuthenticationFailed,
    ExpiredAuthToken,
    InvalidAuthToken,

    // 403 FORBIDDEN
    NotEnoughPermission,
    NotTicketRaiser,

    // 404 NOT FOUND
    MemberNotFound,
    TicketNotFound,

    // 409 CONFLICT
    FeedbackAlreadyExists,
    DuplicateSection,
    DuplicateFacility,

    // 500 SERVER ERRORS
    DatabaseError,
    InternalError,
    TokenGenerationFailed,
    TicketNumberExhausted,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "유효성 검증에 실패했습니다",
            ErrorCode::DuplicateAccountEmail => "이미 등록된 사용자명 또는 이메일입니다",
            ErrorCode::InvalidEmailPwd => "잘못된 자격 증명입니다",
            ErrorCode::InvalidSection => "존재하지 않는 섹션입니다",
            ErrorCode::InvalidFacility => "존재하지 않는 시설입니다",
            ErrorCode::InvalidAssignee => "존재하지 않는 담당자입니다",
            ErrorCode::NotATechnician => "기술자만 티켓에 배정될 수 있습니다",
            ErrorCode::TechnicianSectionMismatch => "기술자가 티켓의 섹션에 속해 있지 않습니다",
            ErrorCode::TicketAlreadyClosed => "해결되었거나 종료된 티켓은 배정할 수 없습니다",
            ErrorCode::InvalidStatusTransition => "허용되지 않는 상태 변경입니다",
            ErrorCode::InvalidRating => "평점은 1.0 이상 5.0 이하여야 합니다",

            ErrorCode::AuthenticationFailed => "인증에 실패했습니다",
            ErrorCode::ExpiredAuthToken => "로그인 토큰이 만료되었습니다",
            ErrorCode::InvalidAuthToken => "유효하지 않은 로그인 토큰입니다",

            ErrorCode::NotEnoughPermission => "권한이 부족합니다",
            ErrorCode::NotTicketRaiser => "티켓을 등록한 사용자만 피드백을 남길 수 있습니다",

            ErrorCode::MemberNotFound => "사용자를 찾을 수 없습니다",
            ErrorCode::TicketNotFound => "티켓을 찾을 수 없습니다",

            ErrorCode::FeedbackAlreadyExists => "이 티켓에는 이미 피드백이 등록되어 있습니다",
            ErrorCode::DuplicateSection => "이미 존재하는 섹션 이름입니다",
            ErrorCode::DuplicateFacility => "이미 존재하는 시설 이름입니다",

            ErrorCode::DatabaseError => "데이터베이스 오류가 발생했습니다",
            ErrorCode::InternalError => "내부 서버 오류가 발생했습니다",
            ErrorCode::TokenGenerationFailed => "토큰 생성에 실패했습니다",
            ErrorCode::TicketNumberExhausted => "발급 가능한 티켓 번호가 없습니다",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::ValidationError |
            ErrorCode::DuplicateAccountEmail |
            ErrorCode::InvalidEmailPwd |
            ErrorCode::InvalidSection |
            ErrorCode::InvalidFacility |
            ErrorCode::InvalidAssignee |
            ErrorCode::NotATechnician |
            ErrorCode::TechnicianSectionMismatch |
            ErrorCode::TicketAlreadyClosed |
            ErrorCode::InvalidStatusTransition |
            ErrorCode::InvalidRating => ErrorKind::Validation,

            ErrorCode::AuthenticationFailed |
            ErrorCode::ExpiredAuthToken |
            ErrorCode::InvalidAuthToken => ErrorKind::Unauthorized,

            ErrorCode::NotEnoughPermission |
            ErrorCode::NotTicketRaiser => ErrorKind::PermissionDenied,

            ErrorCode::MemberNotFound |
            ErrorCode::TicketNotFound => ErrorKind::NotFound,

            ErrorCode::FeedbackAlreadyExists |
            ErrorCode::DuplicateSection |
            ErrorCode::DuplicateFacility => ErrorKind::Conflict,

            ErrorCode::DatabaseError |
            ErrorCode::InternalError |
            ErrorCode::TokenGenerationFailed |
            ErrorCode::TicketNumberExhausted => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ApiError(ErrorCode, Option<String>),

    #[error("유효성 검증에 실패했습니다: {0:?}")]
    ValidationError(Vec<ValidationFieldError>),
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        AppError::ApiError(code, None)
    }

    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        AppError::ApiError(code, Some(detail.into()))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ApiError(code, _) => *code,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        tracing::error!(error = %err, "데이터베이스 오류");
        AppError::with_detail(ErrorCode::DatabaseError, err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!(error = %err, "토큰 생성 실패");
        AppError::new(ErrorCode::TokenGenerationFailed)
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationFieldError>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.code().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.code();
        // 내부 오류의 상세 내용은 응답에 노출하지 않는다
        let (detail, errors) = match self {
            AppError::ApiError(_, _) if code.kind() == ErrorKind::Internal => (None, Vec::new()),
            AppError::ApiError(_, detail) => (detail.clone(), Vec::new()),
            AppError::ValidationError(errors) => (None, errors.clone()),
        };

        HttpResponse::build(code.status_code()).json(ErrorResponse {
            code: format!("{:?}", code),
            message: code.message().to_string(),
            detail,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(ErrorCode::TechnicianSectionMismatch.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotTicketRaiser.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::TicketNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::FeedbackAlreadyExists.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn field_errors_report_validation_kind() {
        let err = AppError::ValidationError(vec![ValidationFieldError::new("title", "필수")]);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_hide_detail() {
        let err = AppError::from(DbErr::Custom("boom".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
