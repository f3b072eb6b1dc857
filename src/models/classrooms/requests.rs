use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub building: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CreateClassroomRequest {
    pub name: String,
    pub building: Option<String>,
    pub capacity: i32,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct UpdateClassroomRequest {
    pub name: Option<String>,
    pub building: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub building: Option<String>,
    pub search: Option<String>,
}

impl From<ClassroomQueryParams> for ClassroomListQuery {
    fn from(params: ClassroomQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            building: params.building,
            search: params.search,
        }
    }
}
