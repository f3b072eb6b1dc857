use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use crate::middlewares::require_jwt::{RequireJWT, user_cache_key};
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::get::linked_profile;
use crate::services::{cache_from_request, write_failed};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(current_user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    // 验证邮箱格式与唯一性
    if let Some(ref email) = update_data.email {
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if let Ok(Some(existing_user)) = storage.get_user_by_email(email).await
            && existing_user.id != current_user.id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
    }

    // 修改密码必须校验当前密码；缓存中的用户不含密码哈希，需重新读取
    let hashed_password = match update_data.new_password {
        Some(ref new_password) => {
            let Some(ref current_password) = update_data.current_password else {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is required to change password",
                )));
            };

            let stored = match storage.get_user_by_id(current_user.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "User not found",
                    )));
                }
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Failed to load user: {e}"),
                        )),
                    );
                }
            };

            if !verify_password(current_password, &stored.password_hash) {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is incorrect",
                )));
            }

            if let Err(msg) = validate_password_simple(new_password) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
            }

            match hash_password(new_password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Password hashing failed: {e}"),
                        )),
                    );
                }
            }
        }
        None => None,
    };

    // 普通用户无权修改角色和状态
    let storage_update = UpdateUserRequest {
        email: update_data.email,
        password: hashed_password,
        role: None,
        status: None,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
    };

    match storage.update_user(current_user.id, storage_update).await {
        Ok(Some(user)) => {
            if let Some(token) = RequireJWT::extract_bearer_token(request) {
                cache_from_request(request)?
                    .remove(&user_cache_key(&token))
                    .await;
            }
            let profile = linked_profile(&storage, &user).await.unwrap_or_else(|e| {
                warn!("Failed to resolve profile for user {}: {}", user.id, e);
                None
            });
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user, profile },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
            "Profile update failed",
        )),
    }
}
