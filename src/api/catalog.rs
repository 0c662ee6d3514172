use actix_web::{get, post, web, HttpResponse};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, SqlErr};

use crate::entity::facility::{self, Entity as FacilityEntity, DEFAULT_FACILITY_STATUS};
use crate::entity::section::{self, Entity as SectionEntity};
use crate::model::catalog::{FacilityCreateRequest, FacilityResponse, SectionCreateRequest, SectionResponse};
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};
use crate::workflow::{find_actor, policy};

const NAME_MAX_CHARS: usize = 100;
const SECTION_DESCRIPTION_MAX_CHARS: usize = 200;

#[utoipa::path(
    post,
    path = "/api/sections",
    summary = "섹션 생성",
    request_body = SectionCreateRequest,
    responses(
        (status = 201, description = "섹션 생성 성공", body = SectionResponse),
        (status = 403, description = "권한 없음"),
        (status = 409, description = "중복된 이름"),
    ),
    tag = "catalog",
)]
#[post("/sections")]
pub async fn create_section(
    body: web::Json<SectionCreateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let actor = find_actor(db.get_ref(), *auth_user).await?;
    policy::ensure_can_manage_catalog(&actor)?;

    let SectionCreateRequest { name, description } = body.into_inner();
    validate_name(&name)?;
    if description.chars().count() > SECTION_DESCRIPTION_MAX_CHARS {
        return Err(AppError::ValidationError(vec![ValidationFieldError::new(
            "description",
            "설명은 200자를 넘을 수 없습니다.",
        )]));
    }

    let inserted = section::ActiveModel {
        name: Set(name),
        description: Set(description),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await
    .map_err(|err| duplicate_or(err, ErrorCode::DuplicateSection))?;

    Ok(HttpResponse::Created().json(SectionResponse::from(inserted)))
}

#[utoipa::path(
    get,
    path = "/api/sections",
    summary = "섹션 목록 조회",
    responses(
        (status = 200, description = "조회 성공", body = Vec<SectionResponse>),
    ),
    tag = "catalog",
)]
#[get("/sections")]
pub async fn list_sections(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let sections = SectionEntity::find()
        .order_by_asc(section::Column::Name)
        .all(db.get_ref())
        .await?;

    let response: Vec<SectionResponse> = sections.into_iter().map(SectionResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/facilities",
    summary = "시설 등록",
    request_body = FacilityCreateRequest,
    responses(
        (status = 201, description = "시설 등록 성공", body = FacilityResponse),
        (status = 403, description = "권한 없음"),
        (status = 409, description = "중복된 이름"),
    ),
    tag = "catalog",
)]
#[post("/facilities")]
pub async fn create_facility(
    body: web::Json<FacilityCreateRequest>,
    db: web::Data<DatabaseConnection>,
    auth_user: web::ReqData<i32>,
) -> Result<HttpResponse, AppError> {
    let actor = find_actor(db.get_ref(), *auth_user).await?;
    policy::ensure_can_manage_catalog(&actor)?;

    let FacilityCreateRequest { name, facility_type, status, location } = body.into_inner();
    validate_name(&name)?;

    let inserted = facility::ActiveModel {
        name: Set(name),
        facility_type: Set(facility_type),
        status: Set(status.unwrap_or_else(|| DEFAULT_FACILITY_STATUS.to_string())),
        location: Set(location),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await
    .map_err(|err| duplicate_or(err, ErrorCode::DuplicateFacility))?;

    Ok(HttpResponse::Created().json(FacilityResponse::from(inserted)))
}

#[utoipa::path(
    get,
    path = "/api/facilities",
    summary = "시설 목록 조회",
    responses(
        (status = 200, description = "조회 성공", body = Vec<FacilityResponse>),
    ),
    tag = "catalog",
)]
#[get("/facilities")]
pub async fn list_facilities(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let facilities = FacilityEntity::find()
        .order_by_asc(facility::Column::Name)
        .all(db.get_ref())
        .await?;

    let response: Vec<FacilityResponse> = facilities.into_iter().map(FacilityResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    let message = if name.trim().is_empty() {
        "이름은 필수입니다."
    } else if name.chars().count() > NAME_MAX_CHARS {
        "이름은 100자를 넘을 수 없습니다."
    } else {
        return Ok(());
    };

    Err(AppError::ValidationError(vec![ValidationFieldError::new("name", message)]))
}

fn duplicate_or(err: DbErr, code: ErrorCode) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::new(code),
        _ => AppError::from(err),
    }
}
