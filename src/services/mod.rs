pub mod attendance;
pub mod auth;
pub mod batches;
pub mod classes;
pub mod classrooms;
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

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use batches::BatchService;
pub use classes::ClassService;
pub use classrooms::ClassroomService;
pub use curricula::CurriculumService;
pub use notifications::NotificationService;
pub use parents::ParentService;
pub use rfid::RfidService;
pub use schedules::ScheduleService;
pub use semesters::SemesterService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::SchoolSysError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从应用状态中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            error::ErrorInternalServerError("Storage not configured")
        })
}

/// 从应用状态中取出缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Cache not found in app data");
            error::ErrorInternalServerError("Cache not configured")
        })
}

/// 写操作失败：唯一约束 → 409，外键不存在 → 400，其余 → 500
pub(crate) fn write_failed(
    err: SchoolSysError,
    conflict_code: ErrorCode,
    conflict_message: &str,
    context: &str,
) -> HttpResponse {
    if err.is_unique_violation() {
        HttpResponse::Conflict().json(ApiResponse::error_empty(conflict_code, conflict_message))
    } else if err.is_foreign_key_violation() {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Referenced record does not exist",
        ))
    } else {
        error!("{}: {}", context, err);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("{context}: {err}"),
        ))
    }
}

/// 删除失败：仍被引用 → 409，其余 → 500
pub(crate) fn delete_failed(err: SchoolSysError, context: &str) -> HttpResponse {
    if err.is_foreign_key_violation() {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Record is still referenced by other records",
        ))
    } else {
        error!("{}: {}", context, err);
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("{context}: {err}"),
        ))
    }
}

/// 读操作失败
pub(crate) fn query_failed(err: SchoolSysError, context: &str) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_write_failure_mapping() {
        let unique = SchoolSysError::database_operation(
            "创建科目失败: UNIQUE constraint failed: subjects.subject_code",
        );
        let resp = write_failed(unique, ErrorCode::SubjectAlreadyExists, "exists", "create");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let fk = SchoolSysError::database_operation("FOREIGN KEY constraint failed");
        let resp = write_failed(fk, ErrorCode::SubjectAlreadyExists, "exists", "create");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let other = SchoolSysError::database_connection("gone");
        let resp = write_failed(other, ErrorCode::SubjectAlreadyExists, "exists", "create");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_delete_of_referenced_row_is_conflict() {
        let fk = SchoolSysError::database_operation("FOREIGN KEY constraint failed");
        assert_eq!(delete_failed(fk, "delete").status(), StatusCode::CONFLICT);
    }
}
