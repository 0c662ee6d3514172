use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// 등록 후 이 시간이 지나도록 `open` 인 티켓은 지연(overdue) 상태로 본다.
pub const OVERDUE_AFTER_HOURS: i64 = 24;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub ticket_no: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub section_id: i32,
    pub facility_id: i32,
    pub raised_by: i32,
    pub status: TicketStatus,
    pub assigned_to: Option<i32>,  // 담당 기술자 ID
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "assigned")]
    Assigned,

    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "resolved")]
    Resolved,

    #[sea_orm(string_value = "closed")]
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Assigned => "assigned",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Pending => "pending",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    /// 해결/종료된 티켓에는 더 이상 담당자를 배정할 수 없다.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// 진행 중인 상태끼리는 자유롭게 오갈 수 있고,
    /// `resolved` 에서는 `closed` 로만, `closed` 에서는 어디로도 갈 수 없다.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        match self {
            TicketStatus::Closed => next == TicketStatus::Closed,
            TicketStatus::Resolved => matches!(next, TicketStatus::Resolved | TicketStatus::Closed),
            _ => true,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id",
        on_delete = "Cascade"
    )]
    Section,

    #[sea_orm(
        belongs_to = "super::facility::Entity",
        from = "Column::FacilityId",
        to = "super::facility::Column::Id",
        on_delete = "Cascade"
    )]
    Facility,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RaisedBy",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    RaisedBy,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedTo",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    AssignedTo,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_one = "super::feedback::Entity")]
    Feedback,

    #[sea_orm(has_many = "super::ticket_log::Entity")]
    TicketLog,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::facility::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Facility.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl Related<super::ticket_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketLog.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now.into());
        }
        self.updated_at = Set(now.into());
        Ok(self)
    }
}

impl Model {
    pub fn time_since_creation(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.status == TicketStatus::Open
            && now.signed_duration_since(self.created_at) > Duration::hours(OVERDUE_AFTER_HOURS)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: TicketStatus, created_at: DateTime<Utc>) -> Model {
        Model {
            id: 1,
            ticket_no: "TKT-000001".to_string(),
            title: "Leaking pipe".to_string(),
            description: "Kitchen sink".to_string(),
            section_id: 1,
            facility_id: 1,
            raised_by: 1,
            status,
            assigned_to: None,
            created_at: created_at.into(),
            updated_at: created_at.into(),
        }
    }

    #[test]
    fn open_ticket_older_than_a_day_is_overdue() {
        let now = Utc::now();
        assert!(ticket(TicketStatus::Open, now - Duration::hours(25)).is_overdue_at(now));
        assert!(!ticket(TicketStatus::Open, now - Duration::minutes(1)).is_overdue_at(now));
        assert!(!ticket(TicketStatus::Open, now - Duration::hours(24)).is_overdue_at(now));
    }

    #[test]
    fn only_open_tickets_become_overdue() {
        let now = Utc::now();
        let old = now - Duration::days(3);
        for status in [TicketStatus::Assigned, TicketStatus::Pending, TicketStatus::Closed] {
            assert!(!ticket(status, old).is_overdue_at(now));
        }
    }

    #[test]
    fn terminal_states_restrict_transitions() {
        assert!(TicketStatus::Resolved.is_terminal());
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Pending.is_terminal());

        assert!(TicketStatus::Pending.can_transition_to(TicketStatus::InProgress));
        assert!(TicketStatus::Resolved.can_transition_to(TicketStatus::Closed));
        assert!(!TicketStatus::Resolved.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Resolved));
    }
}
