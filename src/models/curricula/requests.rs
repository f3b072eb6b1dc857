use super::entities::CurriculumSubject;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub batch_id: Option<i64>,
    pub grade: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateCurriculumRequest {
    pub name: String,
    pub batch_id: Option<i64>,
    pub grade: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<CurriculumSubject>,
}

// subjects 给出时在同一事务内整体替换
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct UpdateCurriculumRequest {
    pub name: Option<String>,
    pub batch_id: Option<i64>,
    pub grade: Option<i32>,
    pub description: Option<String>,
    pub subjects: Option<Vec<CurriculumSubject>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub batch_id: Option<i64>,
    pub grade: Option<i32>,
}

impl From<CurriculumQueryParams> for CurriculumListQuery {
    fn from(params: CurriculumQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            batch_id: params.batch_id,
            grade: params.grade,
        }
    }
}
