use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::entity::facility::Entity as FacilityEntity;
use crate::entity::section::{self, Entity as SectionEntity};
use crate::entity::ticket::{self, Entity as TicketEntity, TicketStatus};
use crate::entity::user::{self, Entity as UserEntity};
use crate::model::global_error::{AppError, ErrorCode, ValidationFieldError};
use crate::workflow::ticket_number::{self, TicketNo};
use crate::workflow::{audit, find_actor, policy};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// 새 티켓 등록 요청. 등록자와 상태는 서버가 정한다.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub section_id: i32,
    pub facility_id: i32,
}

/// 티켓 변경 요청. `None` 은 "요청에 없음" 이다.
///
/// `assigned_to` 는 세 가지 경우를 구분한다: 필드 없음(`None`),
/// 배정 해제(`Some(None)`), 기술자 배정(`Some(Some(id))`).
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<Option<i32>>,
}

#[instrument(skip(db, draft), fields(section_id = draft.section_id, facility_id = draft.facility_id))]
pub async fn create_ticket(
    db: &DatabaseConnection,
    draft: TicketDraft,
    actor_id: i32,
) -> Result<ticket::Model, AppError> {
    validate_text_fields(Some(&draft.title), Some(&draft.description))?;

    let txn = db.begin().await?;

    let actor = find_actor(&txn, actor_id).await?;

    SectionEntity::find_by_id(draft.section_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::with_detail(ErrorCode::InvalidSection, format!("section {}", draft.section_id)))?;

    FacilityEntity::find_by_id(draft.facility_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::with_detail(ErrorCode::InvalidFacility, format!("facility {}", draft.facility_id)))?;

    let ticket_no = ticket_number::next_ticket_number(&txn).await?;

    let new_ticket = ticket::ActiveModel {
        ticket_no: Set(ticket_no.into_string()),
        title: Set(draft.title),
        description: Set(draft.description),
        section_id: Set(draft.section_id),
        facility_id: Set(draft.facility_id),
        raised_by: Set(actor.id),
        status: Set(TicketStatus::Open),
        assigned_to: Set(None),
        ..Default::default()
    };

    let inserted = new_ticket.insert(&txn).await?;
    audit::record(&txn, inserted.id, audit::ticket_created(&actor.username), Some(actor.id)).await?;

    txn.commit().await?;

    info!(ticket_no = %inserted.ticket_no, raised_by = actor.id, "티켓 등록 완료");
    Ok(inserted)
}

/// 담당자/상태 변경의 핵심 전이 함수.
///
/// 티켓 행을 잠근 뒤 검증하므로, 동시에 들어온 요청도 섹션 검사와 종료 상태 검사를 피할 수 없다.
/// 검증, 저장, 감사 로그 중 하나라도 실패하면 아무것도 반영되지 않는다.
#[instrument(skip(db, changes), fields(status = ?changes.status, assigned_to = ?changes.assigned_to))]
pub async fn update_ticket(
    db: &DatabaseConnection,
    ticket_id: i32,
    changes: TicketChanges,
    actor_id: i32,
) -> Result<ticket::Model, AppError> {
    validate_text_fields(changes.title.as_ref(), changes.description.as_ref())?;

    let txn = db.begin().await?;

    let actor = find_actor(&txn, actor_id).await?;
    let current = lock_ticket(&txn, ticket_id).await?;

    let old_status = current.status;
    let old_assigned_to = current.assigned_to;

    let mut new_assigned_to = old_assigned_to;
    let mut assignee: Option<user::Model> = None;

    match changes.assigned_to {
        Some(Some(technician_id)) => {
            let technician = UserEntity::find_by_id(technician_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::with_detail(ErrorCode::InvalidAssignee, format!("user {}", technician_id)))?;

            policy::ensure_assignable(&technician)?;

            if old_assigned_to != Some(technician.id) && technician.section_id != Some(current.section_id) {
                let section_name = section_name(&txn, current.section_id).await?;
                warn!(ticket_id, technician_id, "다른 섹션의 기술자 배정 시도");
                return Err(AppError::with_detail(
                    ErrorCode::TechnicianSectionMismatch,
                    format!("Technician {} does not belong to section {}.", technician.username, section_name),
                ));
            }

            if old_status.is_terminal() {
                warn!(ticket_id, status = %old_status, "종료된 티켓 배정 시도");
                return Err(AppError::with_detail(
                    ErrorCode::TicketAlreadyClosed,
                    "Cannot assign a ticket that is resolved or closed.",
                ));
            }

            new_assigned_to = Some(technician.id);
            assignee = Some(technician);
        }
        Some(None) => new_assigned_to = None,
        None => {}
    }

    let mut new_status = changes.status.unwrap_or(old_status);
    if !old_status.can_transition_to(new_status) {
        return Err(AppError::with_detail(
            ErrorCode::InvalidStatusTransition,
            format!("{} -> {}", old_status, new_status),
        ));
    }

    // 처음 배정되는 open 티켓은 요청된 상태와 관계없이 assigned 가 된다
    if old_assigned_to.is_none() && new_assigned_to.is_some() && old_status == TicketStatus::Open {
        new_status = TicketStatus::Assigned;
    }

    let mut ticket_model: ticket::ActiveModel = current.into();
    if let Some(title) = changes.title {
        ticket_model.title = Set(title);
    }
    if let Some(description) = changes.description {
        ticket_model.description = Set(description);
    }
    ticket_model.status = Set(new_status);
    ticket_model.assigned_to = Set(new_assigned_to);

    let updated = ticket_model.update(&txn).await?;

    if old_assigned_to != new_assigned_to {
        let name = assignee.as_ref().map(|u| u.username.as_str());
        audit::record(&txn, updated.id, audit::assigned(name), Some(actor.id)).await?;
    }

    if old_status != new_status {
        audit::record(&txn, updated.id, audit::status_changed(old_status, new_status), Some(actor.id)).await?;
    }

    txn.commit().await?;

    info!(
        ticket_no = %updated.ticket_no,
        from = %old_status,
        to = %new_status,
        assigned_to = ?new_assigned_to,
        "티켓 변경 완료"
    );
    Ok(updated)
}

/// 24시간 넘게 `open` 인 티켓을 `pending` 으로 옮긴다. 옮겼으면 `true`.
///
/// 주기적 점검은 외부에서 트리거하며, 로그의 수행자는 비어 있다.
#[instrument(skip(db))]
pub async fn mark_overdue_if_needed(db: &DatabaseConnection, ticket_id: i32) -> Result<bool, AppError> {
    let txn = db.begin().await?;
    let current = lock_ticket(&txn, ticket_id).await?;

    if !current.is_overdue_at(Utc::now()) {
        return Ok(false);
    }

    let old_status = current.status;
    let mut ticket_model: ticket::ActiveModel = current.into();
    ticket_model.status = Set(TicketStatus::Pending);
    let updated = ticket_model.update(&txn).await?;

    audit::record(&txn, updated.id, audit::status_changed(old_status, TicketStatus::Pending), None).await?;
    txn.commit().await?;

    info!(ticket_no = %updated.ticket_no, "지연 티켓을 pending 으로 전환");
    Ok(true)
}

pub fn is_overdue(ticket: &ticket::Model) -> bool {
    ticket.is_overdue()
}

pub async fn find_ticket<C: ConnectionTrait>(conn: &C, ticket_id: i32) -> Result<ticket::Model, AppError> {
    TicketEntity::find_by_id(ticket_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TicketNotFound))
}

/// `TKT-000042` 형식의 번호로 티켓을 찾는다. 형식이 틀리면 검증 오류.
pub async fn find_ticket_by_number<C: ConnectionTrait>(conn: &C, raw: &str) -> Result<ticket::Model, AppError> {
    let ticket_no = TicketNo::parse(raw).ok_or_else(|| {
        AppError::ValidationError(vec![ValidationFieldError::new(
            "ticketNo",
            "티켓 번호는 TKT-000000 형식이어야 합니다.",
        )])
    })?;

    TicketEntity::find()
        .filter(ticket::Column::TicketNo.eq(ticket_no.as_str()))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TicketNotFound))
}

async fn lock_ticket(txn: &DatabaseTransaction, ticket_id: i32) -> Result<ticket::Model, AppError> {
    TicketEntity::find_by_id(ticket_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TicketNotFound))
}

async fn section_name(txn: &DatabaseTransaction, section_id: i32) -> Result<String, AppError> {
    let found: Option<section::Model> = SectionEntity::find_by_id(section_id).one(txn).await?;
    Ok(found.map(|s| s.name).unwrap_or_else(|| section_id.to_string()))
}

fn validate_text_fields(title: Option<&String>, description: Option<&String>) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if let Some(title) = title {
        if title.trim().is_empty() {
            errors.push(ValidationFieldError::new("title", "제목은 필수입니다."));
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(ValidationFieldError::new("title", "제목은 100자를 넘을 수 없습니다."));
        }
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(ValidationFieldError::new("description", "설명은 200자를 넘을 수 없습니다."));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}
