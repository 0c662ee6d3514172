//! 티켓 워크플로 엔진.
//!
//! API 계층은 인증된 사용자 ID 와 요청 내용을 넘기고, 여기서 검증 → 상태 전이 →
//! 저장 → 감사 로그 기록을 하나의 트랜잭션으로 처리한다.

pub mod audit;
pub mod comment;
pub mod feedback;
pub mod policy;
pub mod ticket;
pub mod ticket_number;

#[cfg(test)]
pub(crate) mod test_support;

use sea_orm::{ConnectionTrait, EntityTrait};

use crate::entity::user::{self, Entity as UserEntity};
use crate::model::global_error::{AppError, ErrorCode};

pub use comment::{comments_count, create_comment, list_comments};
pub use feedback::{create_feedback, FeedbackDraft};
pub use ticket::{create_ticket, find_ticket, find_ticket_by_number, is_overdue, mark_overdue_if_needed, update_ticket, TicketChanges, TicketDraft};
pub use ticket_number::{next_ticket_number, TicketNo};

pub(crate) async fn find_actor<C: ConnectionTrait>(conn: &C, actor_id: i32) -> Result<user::Model, AppError> {
    UserEntity::find_by_id(actor_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))
}
