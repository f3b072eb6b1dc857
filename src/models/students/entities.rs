use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::batches::entities::Batch;
use crate::models::classes::entities::Class;
use crate::models::parents::entities::LinkedParent;

// 学籍状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    Studying,  // 在读
    Graduated, // 毕业
    Suspended, // 休学
    Dropped,   // 退学
}

impl<'de> Deserialize<'de> for StudentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的学籍状态: '{s}'. 支持的状态: studying, graduated, suspended, dropped"
            ))
        })
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Studying => write!(f, "studying"),
            StudentStatus::Graduated => write!(f, "graduated"),
            StudentStatus::Suspended => write!(f, "suspended"),
            StudentStatus::Dropped => write!(f, "dropped"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "studying" => Ok(StudentStatus::Studying),
            "graduated" => Ok(StudentStatus::Graduated),
            "suspended" => Ok(StudentStatus::Suspended),
            "dropped" => Ok(StudentStatus::Dropped),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: Option<i64>,
    pub student_code: String,
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub class_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub status: StudentStatus,
    pub enrolled_at: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生详情：关联班级、届次与家长
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub class: Option<Class>,
    pub batch: Option<Batch>,
    pub parents: Vec<LinkedParent>,
}
