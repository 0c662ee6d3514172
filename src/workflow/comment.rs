use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entity::comment::{self, Entity as CommentEntity};
use crate::model::global_error::{AppError, ValidationFieldError};
use crate::workflow::ticket::find_ticket;
use crate::workflow::{audit, find_actor, policy};

pub const COMMENT_MAX_CHARS: usize = 500;

#[instrument(skip(db, text))]
pub async fn create_comment(
    db: &DatabaseConnection,
    ticket_id: i32,
    text: String,
    actor_id: i32,
) -> Result<comment::Model, AppError> {
    validate_text(&text)?;

    let txn = db.begin().await?;

    let actor = find_actor(&txn, actor_id).await?;
    let ticket = find_ticket(&txn, ticket_id).await?;

    let new_comment = comment::ActiveModel {
        text: Set(text),
        ticket_id: Set(ticket.id),
        author_id: Set(policy::comment_author(&actor)),
        ..Default::default()
    };

    let inserted = new_comment.insert(&txn).await?;
    audit::record(&txn, ticket.id, audit::comment_added(&actor.username), Some(actor.id)).await?;

    txn.commit().await?;

    info!(ticket_no = %ticket.ticket_no, author = actor.id, "댓글 등록 완료");
    Ok(inserted)
}

/// 작성 순서대로 정렬된 댓글 목록
pub async fn list_comments<C: ConnectionTrait>(conn: &C, ticket_id: i32) -> Result<Vec<comment::Model>, AppError> {
    find_ticket(conn, ticket_id).await?;

    let comments = CommentEntity::find()
        .filter(comment::Column::TicketId.eq(ticket_id))
        .order_by_asc(comment::Column::Id)
        .all(conn)
        .await?;

    Ok(comments)
}

pub async fn comments_count<C: ConnectionTrait>(conn: &C, ticket_id: i32) -> Result<u64, AppError> {
    let count = CommentEntity::find()
        .filter(comment::Column::TicketId.eq(ticket_id))
        .count(conn)
        .await?;

    Ok(count)
}

fn validate_text(text: &str) -> Result<(), AppError> {
    let message = if text.trim().is_empty() {
        "댓글 내용은 필수입니다."
    } else if text.chars().count() > COMMENT_MAX_CHARS {
        "댓글은 500자를 넘을 수 없습니다."
    } else {
        return Ok(());
    };

    Err(AppError::ValidationError(vec![ValidationFieldError::new("text", message)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::global_error::{ErrorCode, ErrorKind};
    use crate::workflow::audit::ticket_logs;
    use crate::workflow::test_support::Fixture;

    #[tokio::test]
    async fn comment_is_authored_by_the_actor_and_logged() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        let comment = create_comment(&fx.db, ticket.id, "On my way".to_string(), fx.plumber.id)
            .await
            .unwrap();

        assert_eq!(comment.author_id, fx.plumber.id);
        assert_eq!(comment.ticket_id, ticket.id);

        let logs = ticket_logs(&fx.db, ticket.id).await.unwrap();
        assert_eq!(logs.last().unwrap().action, "Comment added by bob");
        assert_eq!(logs.last().unwrap().performed_by, Some(fx.plumber.id));
    }

    #[tokio::test]
    async fn comments_are_listed_in_creation_order() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        for text in ["first", "second", "third"] {
            create_comment(&fx.db, ticket.id, text.to_string(), fx.raiser.id).await.unwrap();
        }

        let texts: Vec<_> = list_comments(&fx.db, ticket.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(comments_count(&fx.db, ticket.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn comment_on_missing_ticket_is_not_found() {
        let fx = Fixture::new().await;

        let err = create_comment(&fx.db, 404, "hello".to_string(), fx.raiser.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TicketNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn blank_or_oversized_comments_are_rejected() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        for text in ["  ".to_string(), "x".repeat(COMMENT_MAX_CHARS + 1)] {
            let err = create_comment(&fx.db, ticket.id, text, fx.raiser.id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(comments_count(&fx.db, ticket.id).await.unwrap(), 0);
    }
}
