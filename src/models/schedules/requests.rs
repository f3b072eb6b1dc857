use crate::models::common::PaginationQuery;
use serde::{Deserialize, Deserializer};
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub semester_id: Option<i64>,
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub weekday: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateScheduleRequest {
    pub semester_id: i64,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub schedule_date: String,
    pub period: i32,
    #[serde(default)]
    pub is_free_time: bool,
    pub note: Option<String>,
}

/// 字段缺省时为 None，显式传 null 时为 Some(None)
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// teacher_id / classroom_id / note 传 null 表示清空
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateScheduleRequest {
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[ts(type = "number | null")]
    pub teacher_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[ts(type = "number | null")]
    pub classroom_id: Option<Option<i64>>,
    pub schedule_date: Option<String>,
    pub period: Option<i32>,
    pub is_free_time: Option<bool>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[ts(type = "string | null")]
    pub note: Option<Option<String>>,
}

// 周课表查询：class_id 与 teacher_id 二选一，date 缺省为今天
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct WeeklyScheduleParams {
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub date: Option<String>,
}

// 自动排课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct GenerateScheduleRequest {
    pub semester_id: i64,
    /// 缺省为全部班级
    pub class_ids: Option<Vec<i64>>,
    /// 随机种子，相同输入与种子得到相同结果
    #[ts(type = "number | null")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub semester_id: Option<i64>,
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub weekday: Option<i32>,
}

impl From<ScheduleQueryParams> for ScheduleListQuery {
    fn from(params: ScheduleQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            semester_id: params.semester_id,
            class_id: params.class_id,
            teacher_id: params.teacher_id,
            classroom_id: params.classroom_id,
            date_from: params.date_from,
            date_to: params.date_to,
            weekday: params.weekday,
        }
    }
}
