use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::UserService;
use crate::errors::Result;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::responses::{LinkedProfile, UserResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, query_failed};
use crate::storage::Storage;

/// 按角色查找账号绑定的档案，管理员没有档案
pub(crate) async fn linked_profile(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Option<LinkedProfile>> {
    let profile = match user.role {
        UserRole::Admin => None,
        UserRole::Teacher => storage
            .get_teacher_by_user_id(user.id)
            .await?
            .map(|t| LinkedProfile::Teacher(t.id)),
        UserRole::Student => storage
            .get_student_by_user_id(user.id)
            .await?
            .map(|s| LinkedProfile::Student(s.id)),
        UserRole::Parent => storage
            .get_parent_by_user_id(user.id)
            .await?
            .map(|p| LinkedProfile::Parent(p.id)),
    };
    Ok(profile)
}

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve user")),
    };

    match linked_profile(&storage, &user).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user, profile },
            "User retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to resolve user profile")),
    }
}
