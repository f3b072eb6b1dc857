use super::entities::RfidCard;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rfid.ts")]
pub struct RfidListResponse {
    pub items: Vec<RfidCard>,
    pub pagination: PaginationInfo,
}
