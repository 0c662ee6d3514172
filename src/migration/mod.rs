pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_section_table;
mod m20250601_000002_create_facility_table;
mod m20250601_000003_create_user_table;
mod m20250601_000004_create_ticket_table;
mod m20250601_000005_create_comment_table;
mod m20250601_000006_create_feedback_table;
mod m20250601_000007_create_ticket_log_table;
mod m20250601_000008_create_ticket_sequence_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_section_table::Migration),
            Box::new(m20250601_000002_create_facility_table::Migration),
            Box::new(m20250601_000003_create_user_table::Migration),
            Box::new(m20250601_000004_create_ticket_table::Migration),
            Box::new(m20250601_000005_create_comment_table::Migration),
            Box::new(m20250601_000006_create_feedback_table::Migration),
            Box::new(m20250601_000007_create_ticket_log_table::Migration),
            Box::new(m20250601_000008_create_ticket_sequence_table::Migration),
        ]
    }
}
