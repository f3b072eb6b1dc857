use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学期，日期为 "YYYY-MM-DD"
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct Semester {
    pub id: i64,
    pub name: String,
    pub academic_year: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
