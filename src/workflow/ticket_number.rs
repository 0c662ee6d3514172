use regex::Regex;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

use crate::entity::ticket_sequence::{self, Entity as TicketSequenceEntity, TICKET_SEQUENCE};
use crate::model::global_error::{AppError, ErrorCode};

static TICKET_NO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^TKT-(\d{6})$").expect("valid ticket number pattern")
});

/// 여섯 자리로 표현할 수 있는 마지막 번호
pub const MAX_TICKET_SEQUENCE: i64 = 999_999;

/// `TKT-000042` 형태의 티켓 번호
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TicketNo(String);

impl TicketNo {
    /// 1..=999999 범위를 벗어나면 `None`.
    pub fn from_sequence(sequence: i64) -> Option<Self> {
        (1..=MAX_TICKET_SEQUENCE)
            .contains(&sequence)
            .then(|| TicketNo(format!("TKT-{:06}", sequence)))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        TICKET_NO_PATTERN
            .is_match(raw)
            .then(|| TicketNo(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TicketNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 카운터 행을 증가시키고 새 값을 읽는다.
///
/// 트랜잭션 안에서만 호출할 수 있다. UPDATE 가 잡은 행 잠금은 커밋까지 유지되므로
/// 동시에 생성되는 티켓이 같은 번호를 받을 수 없다.
pub async fn next_ticket_number(txn: &DatabaseTransaction) -> Result<TicketNo, AppError> {
    let result = TicketSequenceEntity::update_many()
        .col_expr(
            ticket_sequence::Column::Value,
            Expr::col(ticket_sequence::Column::Value).add(1),
        )
        .filter(ticket_sequence::Column::Name.eq(TICKET_SEQUENCE))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::with_detail(ErrorCode::InternalError, "ticket sequence row is missing"));
    }

    let sequence = TicketSequenceEntity::find_by_id(TICKET_SEQUENCE)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::with_detail(ErrorCode::InternalError, "ticket sequence row is missing"))?;

    TicketNo::from_sequence(sequence.value).ok_or_else(|| {
        warn!(sequence = sequence.value, "티켓 번호 소진");
        AppError::with_detail(ErrorCode::TicketNumberExhausted, format!("sequence {}", sequence.value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::test_support::setup_db;
    use sea_orm::TransactionTrait;

    #[test]
    fn formats_zero_padded_numbers() {
        assert_eq!(TicketNo::from_sequence(1).unwrap().as_str(), "TKT-000001");
        assert_eq!(TicketNo::from_sequence(123456).unwrap().as_str(), "TKT-123456");
        assert_eq!(TicketNo::from_sequence(MAX_TICKET_SEQUENCE).unwrap().as_str(), "TKT-999999");
    }

    #[test]
    fn sequences_outside_six_digits_have_no_number() {
        assert!(TicketNo::from_sequence(0).is_none());
        assert!(TicketNo::from_sequence(MAX_TICKET_SEQUENCE + 1).is_none());
    }

    #[test]
    fn parse_accepts_only_six_digits() {
        assert_eq!(TicketNo::parse("TKT-000042").map(|n| n.into_string()), Some("TKT-000042".to_string()));
        assert!(TicketNo::parse("TKT-42").is_none());
        assert!(TicketNo::parse("tkt-000042").is_none());
        assert!(TicketNo::parse("TKT-0000042").is_none());
    }

    #[tokio::test]
    async fn sequence_increments_per_call() {
        let db = setup_db().await;

        let txn = db.begin().await.unwrap();
        let first = next_ticket_number(&txn).await.unwrap();
        let second = next_ticket_number(&txn).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(first.as_str(), "TKT-000001");
        assert_eq!(second.as_str(), "TKT-000002");
    }

    #[tokio::test]
    async fn exhausted_sequence_is_rejected_and_not_advanced() {
        let db = setup_db().await;
        TicketSequenceEntity::update_many()
            .col_expr(ticket_sequence::Column::Value, Expr::value(MAX_TICKET_SEQUENCE - 1))
            .filter(ticket_sequence::Column::Name.eq(TICKET_SEQUENCE))
            .exec(&db)
            .await
            .unwrap();

        let txn = db.begin().await.unwrap();
        assert_eq!(next_ticket_number(&txn).await.unwrap().as_str(), "TKT-999999");
        let err = next_ticket_number(&txn).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::TicketNumberExhausted);
        txn.rollback().await.unwrap();

        let stored = TicketSequenceEntity::find_by_id(TICKET_SEQUENCE).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.value, MAX_TICKET_SEQUENCE - 1);
    }

    #[tokio::test]
    async fn rolled_back_issue_is_not_consumed() {
        let db = setup_db().await;

        let txn = db.begin().await.unwrap();
        next_ticket_number(&txn).await.unwrap();
        txn.rollback().await.unwrap();

        let txn = db.begin().await.unwrap();
        let issued = next_ticket_number(&txn).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(issued.as_str(), "TKT-000001");
    }
}
