use super::entities::Batch;
use crate::models::classes::entities::Class;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 创建届次响应，is_new 为 false 表示编码已存在
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct BatchUpsertResponse {
    pub batch: Batch,
    pub is_new: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct BatchDetailResponse {
    pub batch: Batch,
    pub classes: Vec<Class>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct BatchListResponse {
    pub items: Vec<Batch>,
    pub pagination: PaginationInfo,
}
