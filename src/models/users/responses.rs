use serde::Serialize;
use ts_rs::TS;

use super::entities::User;
use crate::models::common::PaginationInfo;

/// 账号对应的学籍/教职工/家长档案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum LinkedProfile {
    Student(i64),
    Teacher(i64),
    Parent(i64),
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
    pub profile: Option<LinkedProfile>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
