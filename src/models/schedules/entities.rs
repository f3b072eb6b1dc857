use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课表记录：某班某日某节的安排，is_free_time 为真时无科目/教师/教室
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ClassSchedule {
    pub id: i64,
    pub semester_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    // "YYYY-MM-DD"
    pub schedule_date: String,
    // 1 = 周一
    pub weekday: i32,
    // 从 1 开始
    pub period: i32,
    pub is_free_time: bool,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 关联了名称的课表条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub schedule: ClassSchedule,
    pub class_name: Option<String>,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    pub classroom_name: Option<String>,
}

// 待写入的课表行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleRow {
    pub semester_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub schedule_date: String,
    pub weekday: i32,
    pub period: i32,
    pub is_free_time: bool,
    pub note: Option<String>,
}

// 占用冲突的维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotConflict {
    Class,
    Teacher,
    Classroom,
}

impl std::fmt::Display for SlotConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotConflict::Class => write!(f, "class"),
            SlotConflict::Teacher => write!(f, "teacher"),
            SlotConflict::Classroom => write!(f, "classroom"),
        }
    }
}
