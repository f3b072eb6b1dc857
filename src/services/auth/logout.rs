use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use crate::middlewares::require_jwt::{RequireJWT, user_cache_key};
use crate::models::auth::requests::RefreshTokenRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::cache_from_request;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 处理用户登出
/// 吊销 refresh token、丢弃已缓存的登录用户，并清除客户端 cookie
pub async fn handle_logout(
    service: &AuthService,
    body: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request)
        .or(body.refresh_token.filter(|t| !t.is_empty()));
    if let Some(token) = refresh_token
        && let Ok(claims) = JwtUtils::verify_refresh_token(&token)
        && let Some(user_id) = claims.user_id()
    {
        let storage = service.get_storage(request)?;
        match storage
            .revoke_refresh_token(&claims.jti, user_id, claims.exp as i64)
            .await
        {
            Ok(_) => debug!("Revoked refresh token {} on logout", claims.jti),
            // 用户已删除时外键失败，令牌本身也已无法使用
            Err(e) if e.is_foreign_key_violation() => {}
            Err(e) => {
                error!("Failed to revoke refresh token {}: {}", claims.jti, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Logout failed",
                    )),
                );
            }
        }
    }

    if let Some(access_token) = RequireJWT::extract_bearer_token(request) {
        cache_from_request(request)?
            .remove(&user_cache_key(&access_token))
            .await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}
