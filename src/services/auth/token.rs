use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::{
    requests::RefreshTokenRequest,
    responses::{RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn login_expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

/// 刷新令牌：旧 refresh token 一经使用即吊销，并签发新的令牌对
pub async fn handle_refresh_token(
    service: &AuthService,
    body: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // Cookie 优先，其次请求体
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request)
        .or(body.refresh_token.filter(|t| !t.is_empty()))
    else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(login_expired());
        }
    };

    let Some(user_id) = claims.user_id() else {
        return Ok(login_expired());
    };

    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => return Ok(login_expired()),
        Err(e) => {
            error!("Refresh token user lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Token refresh failed: {e}"),
                )),
            );
        }
    };

    // 先吊销再签发：同一令牌并发刷新时只有一个请求能成功
    match storage
        .revoke_refresh_token(&claims.jti, user_id, claims.exp as i64)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            warn!(
                "Revoked refresh token reused for user {} (jti {})",
                claims.sub, claims.jti
            );
            return Ok(login_expired());
        }
        Err(e) => {
            error!("Failed to revoke refresh token {}: {}", claims.jti, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Token refresh failed",
                )),
            );
        }
    }

    let lifetime = claims.lifetime();
    match user.generate_token_pair(Some(lifetime)) {
        Ok(pair) => {
            let cookie = JwtUtils::create_refresh_token_cookie(&pair.refresh_token, lifetime);
            Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
                RefreshTokenResponse {
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                    expires_in: JwtUtils::access_token_ttl_secs(),
                },
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            error!("Failed to rotate refresh token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Token refresh failed",
                )),
            )
        }
    }
}

pub async fn handle_verify_token(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = RequireJWT::extract_user_claims(request);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse {
            is_valid: user.is_some(),
            user_id: user.as_ref().map(|u| u.id),
            role: user.map(|u| u.role.to_string()),
        },
        "Token is valid",
    )))
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}
