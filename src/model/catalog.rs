use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::facility::{self, FacilityType};
use crate::entity::section;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SectionCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<section::Model> for SectionResponse {
    fn from(model: section::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCreateRequest {
    pub name: String,
    pub facility_type: Option<FacilityType>,
    pub status: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityResponse {
    pub id: i32,
    pub name: String,
    pub facility_type: Option<FacilityType>,
    pub status: String,
    pub location: Option<String>,
}

impl From<facility::Model> for FacilityResponse {
    fn from(model: facility::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            facility_type: model.facility_type,
            status: model.status,
            location: model.location,
        }
    }
}
