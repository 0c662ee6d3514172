use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};

use crate::entity::facility::{self, FacilityType, DEFAULT_FACILITY_STATUS};
use crate::entity::section;
use crate::entity::ticket::{self, Entity as TicketEntity};
use crate::entity::user::{self, Role};
use crate::migration::{Migrator, MigratorTrait};
use crate::workflow::ticket::{create_ticket, TicketDraft};

/// 마이그레이션이 적용된 인메모리 SQLite. 연결이 하나뿐이어야 같은 DB 를 본다.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("sqlite connection");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub async fn seed_section(db: &DatabaseConnection, name: &str) -> section::Model {
    section::ActiveModel {
        name: Set(name.to_string()),
        description: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert section")
}

pub async fn seed_facility(db: &DatabaseConnection, name: &str) -> facility::Model {
    facility::ActiveModel {
        name: Set(name.to_string()),
        facility_type: Set(Some(FacilityType::Building)),
        status: Set(DEFAULT_FACILITY_STATUS.to_string()),
        location: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert facility")
}

pub async fn seed_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    section_id: Option<i32>,
) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password: Set("not-a-real-hash".to_string()),
        role: Set(role),
        section_id: Set(section_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub struct Fixture {
    pub db: DatabaseConnection,
    pub plumbing: section::Model,
    pub it: section::Model,
    pub facility: facility::Model,
    pub raiser: user::Model,
    pub plumber: user::Model,
    pub second_plumber: user::Model,
    pub it_tech: user::Model,
    pub manager: user::Model,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = setup_db().await;
        let plumbing = seed_section(&db, "Plumbing").await;
        let it = seed_section(&db, "IT").await;
        let facility = seed_facility(&db, "Main Building").await;
        let raiser = seed_user(&db, "alice", Role::User, None).await;
        let plumber = seed_user(&db, "bob", Role::Technician, Some(plumbing.id)).await;
        let second_plumber = seed_user(&db, "carol", Role::Technician, Some(plumbing.id)).await;
        let it_tech = seed_user(&db, "dave", Role::Technician, Some(it.id)).await;
        let manager = seed_user(&db, "erin", Role::Manager, Some(plumbing.id)).await;

        Self {
            db,
            plumbing,
            it,
            facility,
            raiser,
            plumber,
            second_plumber,
            it_tech,
            manager,
        }
    }

    pub fn draft(&self, title: &str) -> TicketDraft {
        TicketDraft {
            title: title.to_string(),
            description: "Water on the floor".to_string(),
            section_id: self.plumbing.id,
            facility_id: self.facility.id,
        }
    }

    /// 배관 섹션에 alice 명의로 티켓을 하나 만든다.
    pub async fn plumbing_ticket(&self) -> ticket::Model {
        create_ticket(&self.db, self.draft("Leaking pipe"), self.raiser.id)
            .await
            .expect("create ticket")
    }

    pub async fn reload(&self, ticket_id: i32) -> ticket::Model {
        TicketEntity::find_by_id(ticket_id)
            .one(&self.db)
            .await
            .expect("query ticket")
            .expect("ticket exists")
    }

    pub async fn force_status(&self, ticket_id: i32, status: ticket::TicketStatus) -> ticket::Model {
        let mut active: ticket::ActiveModel = self.reload(ticket_id).await.into();
        active.status = Set(status);
        active.update(&self.db).await.expect("force status")
    }

    pub async fn backdate(&self, ticket_id: i32, hours: i64) -> ticket::Model {
        let mut active: ticket::ActiveModel = self.reload(ticket_id).await.into();
        active.created_at = Set((Utc::now() - Duration::hours(hours)).into());
        active.update(&self.db).await.expect("backdate ticket")
    }
}
