use super::entities::Curriculum;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumListResponse {
    pub items: Vec<Curriculum>,
    pub pagination: PaginationInfo,
}
