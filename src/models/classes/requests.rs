use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub batch_id: Option<i64>,
    pub grade: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
    pub search: Option<String>,
}

// 创建班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub class_name: String,
    pub grade: i32,
    pub batch_id: Option<i64>,
    pub homeroom_teacher_id: Option<i64>,
    pub description: Option<String>,
}

// 更新班级请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub class_name: Option<String>,
    pub grade: Option<i32>,
    pub batch_id: Option<i64>,
    pub homeroom_teacher_id: Option<i64>,
    pub description: Option<String>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub batch_id: Option<i64>,
    pub grade: Option<i32>,
    pub homeroom_teacher_id: Option<i64>,
    pub search: Option<String>,
}

impl From<ClassQueryParams> for ClassListQuery {
    fn from(params: ClassQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            batch_id: params.batch_id,
            grade: params.grade,
            homeroom_teacher_id: params.homeroom_teacher_id,
            search: params.search,
        }
    }
}
