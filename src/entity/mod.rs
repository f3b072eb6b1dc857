//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod attendance_logs;
pub mod batches;
pub mod class_schedules;
pub mod classes;
pub mod classrooms;
pub mod curricula;
pub mod curriculum_subjects;
pub mod notifications;
pub mod parent_students;
pub mod parents;
pub mod revoked_tokens;
pub mod rfid_cards;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod teacher_subjects;
pub mod teachers;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
