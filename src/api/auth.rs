use actix_web::{get, post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use sea_query::Condition;
use tracing::info;

use crate::auth::jwt::{build_access_token_cookie, JwtUtils};
use crate::entity::user::{self, Entity as UserEntity, Role};
use crate::model::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};

const PASSWORD_MIN_LEN: usize = 8;

#[utoipa::path(
    post,
    path = "/auth/register",
    summary = "회원 가입",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "유효성 검증 실패 또는 중복 계정"),
    ),
    tag = "auth",
)]
#[post("/auth/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    jwt: web::Data<JwtUtils>,
) -> Result<HttpResponse, AppError> {
    validate_register_request(&body.username, &body.email, &body.password)?;

    let txn = db.begin().await?;

    let existing_user = UserEntity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(&body.username))
                .add(user::Column::Email.eq(&body.email))
        )
        .one(&txn)
        .await?;

    if existing_user.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateAccountEmail));
    }

    let hashed_password = hash(&body.password, DEFAULT_COST)
        .map_err(|_| AppError::new(ErrorCode::InternalError))?;

    // 역할 변경은 관리자 몫이다. 가입하면 항상 일반 사용자.
    let new_user = user::ActiveModel {
        username: Set(body.username.clone()),
        email: Set(body.email.clone()),
        password: Set(hashed_password),
        role: Set(Role::User),
        section_id: Set(None),
        ..Default::default()
    };

    let user = new_user.insert(&txn).await?;
    let access_token = jwt.generate_token(user.id, user.role.as_str())?;

    txn.commit().await?;

    info!(user_id = user.id, "회원 가입 완료");
    Ok(HttpResponse::Created()
        .cookie(build_access_token_cookie(&access_token))
        .json(AuthResponse {
            token: access_token,
            user: UserResponse::from(user),
        }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    summary = "로그인",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 400, description = "잘못된 자격 증명"),
    ),
    tag = "auth",
)]
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    jwt: web::Data<JwtUtils>,
) -> Result<HttpResponse, AppError> {
    validate_login_request(&body.email, &body.password)?;

    let user = UserEntity::find()
        .filter(user::Column::Email.eq(&body.email))
        .one(db.get_ref())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidEmailPwd))?;

    let is_valid = verify(&body.password, &user.password)
        .map_err(|_| AppError::new(ErrorCode::InternalError))?;

    if !is_valid {
        return Err(AppError::new(ErrorCode::InvalidEmailPwd));
    }

    let access_token = jwt.generate_token(user.id, user.role.as_str())?;

    Ok(HttpResponse::Ok()
        .cookie(build_access_token_cookie(&access_token))
        .json(AuthResponse {
            token: access_token,
            user: UserResponse::from(user),
        }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    summary = "내 정보 조회",
    responses(
        (status = 200, description = "조회 성공", body = UserResponse),
    ),
    tag = "auth",
)]
#[get("/auth/me")]
pub async fn get_me(
    db: web::Data<DatabaseConnection>,
    user_id: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let user = UserEntity::find_by_id(*user_id)
        .one(db.get_ref())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

fn validate_login_request(email: &str, password: &str) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if email.trim().is_empty() {
        errors.push(ValidationFieldError::new("email", "이메일은 필수입니다."));
    }

    if password.is_empty() {
        errors.push(ValidationFieldError::new("password", "비밀번호는 필수입니다."));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

fn validate_register_request(username: &str, email: &str, password: &str) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if username.trim().is_empty() {
        errors.push(ValidationFieldError::new("username", "사용자명은 필수입니다."));
    }

    if email.trim().is_empty() {
        errors.push(ValidationFieldError::new("email", "이메일은 필수입니다."));
    } else if !email.contains('@') {
        errors.push(ValidationFieldError::new("email", "유효한 이메일 형식이 아닙니다."));
    }

    if password.len() < PASSWORD_MIN_LEN {
        errors.push(ValidationFieldError::new("password", "비밀번호는 최소 8자 이상이어야 합니다."));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_validation_collects_every_field() {
        match validate_register_request(" ", "not-an-email", "short") {
            Err(AppError::ValidationError(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["username", "email", "password"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(validate_register_request("alice", "alice@example.com", "long-enough").is_ok());
    }
}
