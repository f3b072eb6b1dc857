//! 学生数据可见范围
//!
//! 教师与管理员可见全部学生；学生只可见自己；家长只可见已关联的子女。

use actix_web::HttpResponse;
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    users::entities::{User, UserRole},
};
use crate::services::query_failed;
use crate::storage::Storage;

/// 可见的学生ID，None 表示不限制
pub(crate) async fn visible_student_ids(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Option<Vec<i64>>, HttpResponse> {
    match user.role {
        UserRole::Admin | UserRole::Teacher => Ok(None),
        UserRole::Student => match storage.get_student_by_user_id(user.id).await {
            Ok(Some(student)) => Ok(Some(vec![student.id])),
            Ok(None) => Ok(Some(Vec::new())),
            Err(e) => Err(query_failed(e, "Failed to resolve student profile")),
        },
        UserRole::Parent => match storage.get_parent_by_user_id(user.id).await {
            Ok(Some(parent)) => storage
                .list_child_ids(parent.id)
                .await
                .map(Some)
                .map_err(|e| query_failed(e, "Failed to resolve linked children")),
            Ok(None) => Ok(Some(Vec::new())),
            Err(e) => Err(query_failed(e, "Failed to resolve parent profile")),
        },
    }
}

/// 当前用户能否查看指定学生
pub(crate) async fn ensure_student_visible(
    storage: &Arc<dyn Storage>,
    user: &User,
    student_id: i64,
) -> Result<(), HttpResponse> {
    match visible_student_ids(storage, user).await? {
        None => Ok(()),
        Some(ids) if ids.contains(&student_id) => Ok(()),
        Some(_) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have access to this student",
        ))),
    }
}
