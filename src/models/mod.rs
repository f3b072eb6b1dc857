pub mod attendance;
pub mod auth;
pub mod batches;
pub mod classes;
pub mod classrooms;
pub mod common;
pub mod curricula;
pub mod notifications;
pub mod parents;
pub mod rfid;
pub mod schedules;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 应用启动时间，放入 app data 供系统信息接口计算运行时长
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
