use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::subjects::entities::Subject;

// 教师在职状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub enum TeacherStatus {
    Active,
    OnLeave,
    Resigned,
}

impl std::fmt::Display for TeacherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeacherStatus::Active => write!(f, "active"),
            TeacherStatus::OnLeave => write!(f, "on_leave"),
            TeacherStatus::Resigned => write!(f, "resigned"),
        }
    }
}

impl std::str::FromStr for TeacherStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TeacherStatus::Active),
            "on_leave" => Ok(TeacherStatus::OnLeave),
            "resigned" => Ok(TeacherStatus::Resigned),
            _ => Err(format!("Invalid teacher status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    // 关联的登录账号
    pub user_id: Option<i64>,
    pub teacher_code: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: TeacherStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 教师详情：附带可任教科目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub teacher: Teacher,
    pub subjects: Vec<Subject>,
}
