use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::entity::ticket::{self, TicketStatus};
use crate::entity::{comment, feedback, ticket_log};
use crate::workflow::{FeedbackDraft, TicketChanges, TicketDraft};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreateRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub section_id: i32,
    pub facility_id: i32,
}

impl From<TicketCreateRequest> for TicketDraft {
    fn from(request: TicketCreateRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            section_id: request.section_id,
            facility_id: request.facility_id,
        }
    }
}

/// 필드가 없으면 변경하지 않는다. `assignedToId: null` 은 배정 해제다.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub assigned_to_id: Option<Option<i32>>,
}

// 필드가 존재하면 값이 null 이라도 Some 으로 감싼다
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<TicketUpdateRequest> for TicketChanges {
    fn from(request: TicketUpdateRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            status: request.status,
            assigned_to: request.assigned_to_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i32,
    pub ticket_no: String,
    pub title: String,
    pub description: String,
    pub section_id: i32,
    pub facility_id: i32,
    pub raised_by: i32,
    pub status: TicketStatus,
    pub assigned_to: Option<i32>,
    pub is_overdue: bool,
    /// 등록 후 경과 시간(초)
    pub time_since_creation: i64,
    /// 단건 조회에서만 채워진다
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketResponse {
    pub fn with_comments_count(mut self, count: u64) -> Self {
        self.comments_count = Some(count);
        self
    }
}

impl From<ticket::Model> for TicketResponse {
    fn from(model: ticket::Model) -> Self {
        let is_overdue = model.is_overdue();
        let time_since_creation = model.time_since_creation().num_seconds();
        Self {
            id: model.id,
            ticket_no: model.ticket_no,
            title: model.title,
            description: model.description,
            section_id: model.section_id,
            facility_id: model.facility_id,
            raised_by: model.raised_by,
            status: model.status,
            assigned_to: model.assigned_to,
            is_overdue,
            time_since_creation,
            comments_count: None,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverdueCheckResponse {
    pub transitioned: bool,
    pub ticket: TicketResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLogResponse {
    pub id: i32,
    pub action: String,
    pub performed_by: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<ticket_log::Model> for TicketLogResponse {
    fn from(model: ticket_log::Model) -> Self {
        Self {
            id: model.id,
            action: model.action,
            performed_by: model.performed_by,
            timestamp: model.timestamp.into(),
        }
    }
}

/// 작성자는 서버가 채운다. 클라이언트가 보낸 author 필드는 무시된다.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentCreateRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub ticket_id: i32,
    pub text: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            text: model.text,
            author_id: model.author_id,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackCreateRequest {
    pub rating: f64,
    pub comment: Option<String>,
}

impl From<FeedbackCreateRequest> for FeedbackDraft {
    fn from(request: FeedbackCreateRequest) -> Self {
        Self {
            rating: request.rating,
            comment: request.comment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: i32,
    pub ticket_id: i32,
    pub rated_by: i32,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(model: feedback::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            rated_by: model.rated_by,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at.into(),
        }
    }
}
