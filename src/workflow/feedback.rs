use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::entity::feedback::{self, Entity as FeedbackEntity, MAX_RATING, MIN_RATING};
use crate::model::global_error::{AppError, ErrorCode};
use crate::workflow::ticket::find_ticket;
use crate::workflow::{audit, find_actor, policy};

#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub rating: f64,
    pub comment: Option<String>,
}

/// 티켓 등록자의 만족도 평가. 티켓당 하나만 허용된다.
#[instrument(skip(db, draft), fields(rating = draft.rating))]
pub async fn create_feedback(
    db: &DatabaseConnection,
    ticket_id: i32,
    draft: FeedbackDraft,
    actor_id: i32,
) -> Result<feedback::Model, AppError> {
    if !draft.rating.is_finite() || draft.rating < MIN_RATING || draft.rating > MAX_RATING {
        return Err(AppError::with_detail(ErrorCode::InvalidRating, draft.rating.to_string()));
    }

    let txn = db.begin().await?;

    let actor = find_actor(&txn, actor_id).await?;
    let ticket = find_ticket(&txn, ticket_id).await?;

    if let Err(err) = policy::ensure_feedback_author(&ticket, &actor) {
        warn!(ticket_id, actor_id, "등록자가 아닌 사용자의 피드백 시도");
        return Err(err);
    }

    let existing = FeedbackEntity::find()
        .filter(feedback::Column::TicketId.eq(ticket.id))
        .one(&txn)
        .await?;

    if existing.is_some() {
        return Err(AppError::new(ErrorCode::FeedbackAlreadyExists));
    }

    let new_feedback = feedback::ActiveModel {
        ticket_id: Set(ticket.id),
        rated_by: Set(actor.id),
        rating: Set(draft.rating),
        comment: Set(draft.comment),
        ..Default::default()
    };

    // 동시에 들어온 요청은 유니크 제약에서 걸러진다
    let inserted = new_feedback.insert(&txn).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::new(ErrorCode::FeedbackAlreadyExists),
        _ => AppError::from(err),
    })?;

    audit::record(&txn, ticket.id, audit::feedback_added(inserted.rating, &actor.username), Some(actor.id)).await?;

    txn.commit().await?;

    info!(ticket_no = %ticket.ticket_no, rating = inserted.rating, "피드백 등록 완료");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::global_error::ErrorKind;
    use crate::workflow::audit::ticket_logs;
    use crate::workflow::test_support::Fixture;

    fn rating(rating: f64) -> FeedbackDraft {
        FeedbackDraft {
            rating,
            comment: Some("Quick fix".to_string()),
        }
    }

    #[tokio::test]
    async fn raiser_can_leave_feedback_once() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        let created = create_feedback(&fx.db, ticket.id, rating(4.5), fx.raiser.id).await.unwrap();
        assert_eq!(created.rated_by, fx.raiser.id);
        assert_eq!(created.rating, 4.5);

        let logs = ticket_logs(&fx.db, ticket.id).await.unwrap();
        assert_eq!(logs.last().unwrap().action, "Feedback (4.5/5) added by alice");

        let err = create_feedback(&fx.db, ticket.id, rating(2.0), fx.raiser.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FeedbackAlreadyExists);
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn log_keeps_full_rating_precision() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        let created = create_feedback(&fx.db, ticket.id, rating(4.25), fx.raiser.id).await.unwrap();
        assert_eq!(created.rating, 4.25);

        let logs = ticket_logs(&fx.db, ticket.id).await.unwrap();
        assert_eq!(logs.last().unwrap().action, "Feedback (4.25/5) added by alice");
    }

    #[tokio::test]
    async fn non_raiser_is_denied() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        let err = create_feedback(&fx.db, ticket.id, rating(5.0), fx.plumber.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(FeedbackEntity::find().one(&fx.db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rating_must_be_between_one_and_five() {
        let fx = Fixture::new().await;
        let ticket = fx.plumbing_ticket().await;

        for bad in [0.5, 5.5, f64::NAN] {
            let err = create_feedback(&fx.db, ticket.id, rating(bad), fx.raiser.id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidRating);
        }

        assert!(create_feedback(&fx.db, ticket.id, rating(1.0), fx.raiser.id).await.is_ok());
    }

    #[tokio::test]
    async fn feedback_on_missing_ticket_is_not_found() {
        let fx = Fixture::new().await;
        let err = create_feedback(&fx.db, 31, rating(3.0), fx.raiser.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
