use super::entities::Classroom;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomListResponse {
    pub items: Vec<Classroom>,
    pub pagination: PaginationInfo,
}
