use sea_orm::Schema;
use sea_orm_migration::prelude::*;
use crate::entity::ticket::{Column, Entity};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(
                schema
                    .create_table_from_entity(Entity)
                    .if_not_exists()
                    .to_owned()
            )
            .await?;

        // 지연 티켓 조회용
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_status_created_at")
                    .table(Entity)
                    .col(Column::Status)
                    .col(Column::CreatedAt)
                    .if_not_exists()
                    .to_owned()
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
