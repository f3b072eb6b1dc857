pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{
    LoginRequest, RefreshTokenRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 用户注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌（轮换）
    pub async fn refresh_token(
        &self,
        body: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, body, request).await
    }

    // 登出
    pub async fn logout(
        &self,
        body: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, body, request).await
    }

    // 验证令牌
    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(request).await
    }

    // 获取当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(request).await
    }

    // 更新用户资料
    pub async fn update_profile(
        &self,
        update_request: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_profile(self, update_request, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{
        HttpResponse, body::to_bytes, http::StatusCode, test::TestRequest, web,
    };

    const PASSWORD: &str = "Lesson2Plan";

    async fn service() -> AuthService {
        let storage = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open");
        AuthService::with_storage(Arc::new(storage))
    }

    fn http_request() -> HttpRequest {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new().unwrap());
        TestRequest::default()
            .app_data(web::Data::new(cache))
            .to_http_request()
    }

    fn register_request(username: &str, role: UserRole) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: PASSWORD.to_string(),
            role,
            display_name: None,
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    fn refresh_body(token: &str) -> RefreshTokenRequest {
        RefreshTokenRequest {
            refresh_token: Some(token.to_string()),
        }
    }

    async fn json(resp: HttpResponse) -> serde_json::Value {
        let body = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn refresh_token_of(resp: HttpResponse) -> String {
        json(resp).await["data"]["refresh_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[actix_web::test]
    async fn test_only_students_and_parents_self_register() {
        let service = service().await;
        let http = http_request();

        let teacher = service
            .register(register_request("teacher_01", UserRole::Teacher), &http)
            .await
            .unwrap();
        assert_eq!(teacher.status(), StatusCode::FORBIDDEN);

        let admin = service
            .register(register_request("admin_01", UserRole::Admin), &http)
            .await
            .unwrap();
        assert_eq!(admin.status(), StatusCode::FORBIDDEN);

        let student = service
            .register(register_request("student_01", UserRole::Student), &http)
            .await
            .unwrap();
        assert_eq!(student.status(), StatusCode::CREATED);

        let parent = service
            .register(register_request("parent_01", UserRole::Parent), &http)
            .await
            .unwrap();
        assert_eq!(parent.status(), StatusCode::CREATED);

        let again = service
            .register(register_request("student_01", UserRole::Student), &http)
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_login_checks_password() {
        let service = service().await;
        let http = http_request();
        service
            .register(register_request("student_02", UserRole::Student), &http)
            .await
            .unwrap();

        let wrong = service
            .login(login_request("student_02", "Wrong1Pass"), &http)
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let by_email = service
            .login(login_request("student_02@school.test", PASSWORD), &http)
            .await
            .unwrap();
        assert_eq!(by_email.status(), StatusCode::OK);

        let body = json(by_email).await;
        assert_eq!(body["data"]["user"]["username"], "student_02");
        assert!(body["data"]["access_token"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_used_refresh_token_is_rejected() {
        let service = service().await;
        let http = http_request();
        service
            .register(register_request("student_03", UserRole::Student), &http)
            .await
            .unwrap();

        let login = service
            .login(login_request("student_03", PASSWORD), &http)
            .await
            .unwrap();
        let first = refresh_token_of(login).await;

        let rotated = service
            .refresh_token(refresh_body(&first), &http)
            .await
            .unwrap();
        assert_eq!(rotated.status(), StatusCode::OK);
        let second = refresh_token_of(rotated).await;
        assert_ne!(first, second);

        // 旧令牌已在轮换时吊销
        let reused = service
            .refresh_token(refresh_body(&first), &http)
            .await
            .unwrap();
        assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);

        // 新令牌仍然可用
        let third = service
            .refresh_token(refresh_body(&second), &http)
            .await
            .unwrap();
        assert_eq!(third.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_logged_out_refresh_token_is_rejected() {
        let service = service().await;
        let http = http_request();
        service
            .register(register_request("parent_02", UserRole::Parent), &http)
            .await
            .unwrap();

        let login = service
            .login(login_request("parent_02", PASSWORD), &http)
            .await
            .unwrap();
        let token = refresh_token_of(login).await;

        let logout = service.logout(refresh_body(&token), &http).await.unwrap();
        assert_eq!(logout.status(), StatusCode::OK);

        let refreshed = service
            .refresh_token(refresh_body(&token), &http)
            .await
            .unwrap();
        assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);

        // 重复登出不报错
        let again = service.logout(refresh_body(&token), &http).await.unwrap();
        assert_eq!(again.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_refresh_without_token_is_unauthorized() {
        let service = service().await;
        let http = http_request();

        let resp = service
            .refresh_token(RefreshTokenRequest::default(), &http)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let garbage = service
            .refresh_token(refresh_body("not-a-jwt"), &http)
            .await
            .unwrap();
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    }
}
