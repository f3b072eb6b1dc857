use super::entities::AttendanceLog;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceLog>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceResponse {
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CheckInResponse {
    pub log: AttendanceLog,
    pub student_name: String,
    pub period: Option<i32>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryResponse {
    pub student_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub total: i64,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    /// 出勤率，万分比
    pub attendance_rate_bp: i64,
}
