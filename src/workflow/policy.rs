//! 누가 무엇을 할 수 있는지에 대한 규칙. 엔티티 검증과 별개로 액션 경계에서 적용한다.

use crate::entity::ticket;
use crate::entity::user::{self, Role};
use crate::model::global_error::{AppError, ErrorCode};

/// 기술자만 티켓 담당자가 될 수 있다.
pub fn ensure_assignable(candidate: &user::Model) -> Result<(), AppError> {
    if candidate.role != Role::Technician {
        return Err(AppError::with_detail(
            ErrorCode::NotATechnician,
            format!("{} is a {}, not a technician", candidate.username, candidate.role.as_str()),
        ));
    }
    Ok(())
}

/// 피드백은 티켓을 등록한 사용자만 남길 수 있다.
pub fn ensure_feedback_author(ticket: &ticket::Model, actor: &user::Model) -> Result<(), AppError> {
    if ticket.raised_by != actor.id {
        return Err(AppError::new(ErrorCode::NotTicketRaiser));
    }
    Ok(())
}

/// 섹션과 시설 목록은 관리자와 매니저만 관리한다.
pub fn ensure_can_manage_catalog(actor: &user::Model) -> Result<(), AppError> {
    match actor.role {
        Role::Admin | Role::Manager => Ok(()),
        _ => Err(AppError::new(ErrorCode::NotEnoughPermission)),
    }
}

/// 댓글 작성자는 항상 요청한 사용자다. 클라이언트가 보낸 값은 쓰지 않는다.
pub fn comment_author(actor: &user::Model) -> i32 {
    actor.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ticket::TicketStatus;
    use crate::model::global_error::ErrorKind;
    use chrono::Utc;

    fn user(id: i32, role: Role) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password: String::new(),
            role,
            section_id: Some(1),
            created_at: now,
            updated_at: now,
        }
    }

    fn ticket_raised_by(raised_by: i32) -> ticket::Model {
        let now = Utc::now().into();
        ticket::Model {
            id: 1,
            ticket_no: "TKT-000001".to_string(),
            title: "Broken light".to_string(),
            description: String::new(),
            section_id: 1,
            facility_id: 1,
            raised_by,
            status: TicketStatus::Resolved,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_technicians_are_assignable() {
        assert!(ensure_assignable(&user(1, Role::Technician)).is_ok());
        for role in [Role::User, Role::Admin, Role::Manager] {
            let err = ensure_assignable(&user(1, role)).unwrap_err();
            assert_eq!(err.code(), ErrorCode::NotATechnician);
        }
    }

    #[test]
    fn feedback_is_reserved_for_the_raiser() {
        let ticket = ticket_raised_by(7);
        assert!(ensure_feedback_author(&ticket, &user(7, Role::User)).is_ok());

        let err = ensure_feedback_author(&ticket, &user(8, Role::Admin)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn catalog_is_managed_by_admins_and_managers() {
        assert!(ensure_can_manage_catalog(&user(1, Role::Admin)).is_ok());
        assert!(ensure_can_manage_catalog(&user(1, Role::Manager)).is_ok());
        for role in [Role::User, Role::Technician] {
            let err = ensure_can_manage_catalog(&user(1, role)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        }
    }

    #[test]
    fn comment_author_is_the_actor() {
        assert_eq!(comment_author(&user(3, Role::User)), 3);
    }
}
