use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub facility_type: Option<FacilityType>,
    pub status: String,  // "active" 가 기본값
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "facility_type")]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    #[sea_orm(string_value = "building")]
    Building,

    #[sea_orm(string_value = "ict")]
    Ict,

    #[sea_orm(string_value = "laundry")]
    Laundry,

    #[sea_orm(string_value = "kitchen")]
    Kitchen,

    #[sea_orm(string_value = "residential")]
    Residential,
}

pub const DEFAULT_FACILITY_STATUS: &str = "active";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ticket::Entity")]
    Ticket,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
