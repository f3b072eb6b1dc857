use super::entities::AttendanceStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<AttendanceStatus>,
}

// 手工记录考勤，日期缺省为今天（有 schedule_id 时取课表日期）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordAttendanceRequest {
    pub student_id: i64,
    pub attendance_date: Option<String>,
    pub schedule_id: Option<i64>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceItem {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

// 按课点名
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceRequest {
    pub schedule_id: i64,
    pub entries: Vec<BulkAttendanceItem>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CheckInRequest {
    pub tag: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryParams {
    pub student_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

// 考勤列表查询参数（用于存储层），student_ids 用于按角色限定范围
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<AttendanceStatus>,
    #[ts(skip)]
    #[serde(skip)]
    pub student_ids: Option<Vec<i64>>,
}

impl From<AttendanceQueryParams> for AttendanceListQuery {
    fn from(params: AttendanceQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            class_id: params.class_id,
            student_id: params.student_id,
            date_from: params.date_from,
            date_to: params.date_to,
            status: params.status,
            student_ids: None,
        }
    }
}
