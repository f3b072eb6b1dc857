use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 届次：入学年份到毕业年份的一批学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/batch.ts")]
pub struct Batch {
    pub id: i64,
    // 届次编码，例如 "2021-2024"
    pub batch_code: String,
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Batch {
    /// 未指定编码时使用 "{start_year}-{end_year}"
    pub fn default_code(start_year: i32, end_year: i32) -> String {
        format!("{start_year}-{end_year}")
    }
}
