use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::ticket::TicketStatus;
use crate::entity::ticket_log::{self, Entity as TicketLogEntity};
use crate::model::global_error::AppError;

/// 감사 로그 한 줄을 추가한다.
///
/// 호출자의 트랜잭션 안에서 기록되므로, 기록이 실패하면 업무 변경도 함께 롤백된다.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    ticket_id: i32,
    action: String,
    performed_by: Option<i32>,
) -> Result<ticket_log::Model, AppError> {
    let entry = ticket_log::ActiveModel {
        ticket_id: Set(ticket_id),
        action: Set(action),
        performed_by: Set(performed_by),
        ..Default::default()
    };

    Ok(entry.insert(conn).await?)
}

pub async fn ticket_logs<C: ConnectionTrait>(conn: &C, ticket_id: i32) -> Result<Vec<ticket_log::Model>, AppError> {
    let logs = TicketLogEntity::find()
        .filter(ticket_log::Column::TicketId.eq(ticket_id))
        .order_by_asc(ticket_log::Column::Id)
        .all(conn)
        .await?;

    Ok(logs)
}

pub fn ticket_created(username: &str) -> String {
    format!("Ticket created by {}", username)
}

pub fn assigned(assignee: Option<&str>) -> String {
    format!("Assigned to {}", assignee.unwrap_or("None"))
}

pub fn status_changed(old: TicketStatus, new: TicketStatus) -> String {
    format!("Status changed from {} to {}", old, new)
}

pub fn comment_added(username: &str) -> String {
    format!("Comment added by {}", username)
}

/// 평점은 저장된 값 그대로 남긴다 (`4.0`, `4.25`).
pub fn feedback_added(rating: f64, username: &str) -> String {
    format!("Feedback ({:?}/5) added by {}", rating, username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_messages() {
        assert_eq!(ticket_created("alice"), "Ticket created by alice");
        assert_eq!(assigned(Some("bob")), "Assigned to bob");
        assert_eq!(assigned(None), "Assigned to None");
        assert_eq!(
            status_changed(TicketStatus::Open, TicketStatus::InProgress),
            "Status changed from open to in_progress"
        );
        assert_eq!(feedback_added(4.0, "alice"), "Feedback (4.0/5) added by alice");
        assert_eq!(feedback_added(4.25, "alice"), "Feedback (4.25/5) added by alice");
    }
}
