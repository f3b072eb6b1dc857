use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::students::entities::Student;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct Parent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生视角下的家长（带关系说明）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct LinkedParent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub parent: Parent,
    pub relationship: String,
}

// 家长视角下的子女
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct LinkedStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub relationship: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub parent: Parent,
    pub children: Vec<LinkedStudent>,
}
