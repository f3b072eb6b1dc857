use super::entities::TeacherStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject_id: Option<i64>,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub teacher_code: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub subject_ids: Vec<i64>,
}

// subject_ids 给出时整体替换可任教科目
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<i64>,
    pub status: Option<TeacherStatus>,
    pub subject_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
    pub status: Option<TeacherStatus>,
    pub search: Option<String>,
}

impl From<TeacherQueryParams> for TeacherListQuery {
    fn from(params: TeacherQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            subject_id: params.subject_id,
            status: params.status,
            search: params.search,
        }
    }
}
