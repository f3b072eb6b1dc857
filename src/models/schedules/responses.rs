use super::entities::ScheduleEntry;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleEntry>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct WeeklyScheduleResponse {
    pub week_start: String,
    pub week_end: String,
    pub entries: Vec<ScheduleEntry>,
}

// 未能排入的课时
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UnscheduledSession {
    pub class_id: i64,
    pub subject_id: i64,
    pub missing_sessions: i32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ClassGenerationSummary {
    pub class_id: i64,
    pub class_name: String,
    pub curriculum_id: Option<i64>,
    pub placed_sessions: i32,
    pub free_slots: i32,
}

// 自动排课结果报告（周模板维度统计）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct GenerationReport {
    pub semester_id: i64,
    #[ts(type = "number")]
    pub seed: u64,
    pub classes: Vec<ClassGenerationSummary>,
    pub placed_sessions: i32,
    pub free_slots: i32,
    pub unscheduled: Vec<UnscheduledSession>,
    pub weeks: i32,
    pub rows_written: i64,
}
