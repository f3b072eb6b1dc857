use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教学大纲中的一门科目及其每周课时
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumSubject {
    pub subject_id: i64,
    pub sessions_per_week: i32,
}

// 教学大纲：某届次某年级的科目安排
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Curriculum {
    pub id: i64,
    pub name: String,
    pub batch_id: Option<i64>,
    pub grade: i32,
    pub description: Option<String>,
    pub subjects: Vec<CurriculumSubject>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Curriculum {
    /// 每周总课时
    pub fn weekly_sessions(&self) -> i32 {
        self.subjects.iter().map(|s| s.sessions_per_week).sum()
    }
}
