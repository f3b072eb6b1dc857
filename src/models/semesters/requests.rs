use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct SemesterQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
    pub is_current: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct CreateSemesterRequest {
    pub name: String,
    pub academic_year: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct UpdateSemesterRequest {
    pub name: Option<String>,
    pub academic_year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/semester.ts")]
pub struct SemesterListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub academic_year: Option<String>,
    pub is_current: Option<bool>,
}

impl From<SemesterQueryParams> for SemesterListQuery {
    fn from(params: SemesterQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            academic_year: params.academic_year,
            is_current: params.is_current,
        }
    }
}
