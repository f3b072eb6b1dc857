use serde::Serialize;
use ts_rs::TS;

use super::entities::Class;
use crate::models::batches::entities::Batch;
use crate::models::common::PaginationInfo;
use crate::models::teachers::entities::Teacher;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<Class>,
    pub pagination: PaginationInfo,
}

/// 班级详情，附带届次、班主任和在读学生人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub batch: Option<Batch>,
    pub homeroom_teacher: Option<Teacher>,
    pub student_count: i64,
}
