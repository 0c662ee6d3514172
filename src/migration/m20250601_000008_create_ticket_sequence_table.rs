use sea_orm::Schema;
use sea_orm_migration::prelude::*;
use crate::entity::ticket_sequence::{Column, Entity, TICKET_SEQUENCE};

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

        // 카운터 행은 마이그레이션에서 한 번만 만든다. 발급 시에는 UPDATE 만 한다.
        let seed = Query::insert()
            .into_table(Entity)
            .columns([Column::Name, Column::Value])
            .values_panic([TICKET_SEQUENCE.into(), 0i64.into()])
            .to_owned();

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
