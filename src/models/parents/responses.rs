use super::entities::Parent;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentListResponse {
    pub items: Vec<Parent>,
    pub pagination: PaginationInfo,
}
