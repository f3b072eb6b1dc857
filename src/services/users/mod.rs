pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
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

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};

    async fn service() -> UserService {
        let storage = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open");
        UserService::with_storage(Arc::new(storage))
    }

    fn admin(id: i64) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: "admin".to_string(),
            email: "admin@school.test".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn teacher_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "Teach1ng!".to_string(),
            role: UserRole::Teacher,
            display_name: None,
            avatar_url: None,
        }
    }

    #[actix_web::test]
    async fn test_duplicate_username_is_conflict() {
        let service = service().await;
        let request = TestRequest::default().to_http_request();

        let first = service
            .create_user(teacher_request("teacher1"), &request)
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = service
            .create_user(teacher_request("teacher1"), &request)
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_invalid_username_is_rejected() {
        let service = service().await;
        let request = TestRequest::default().to_http_request();

        let resp = service
            .create_user(teacher_request("x"), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_cannot_delete_self() {
        let service = service().await;
        let request = TestRequest::default().to_http_request();
        request.extensions_mut().insert(admin(7));

        let resp = service.delete_user(7, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let missing = service.delete_user(99, &request).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_teacher_account_resolves_linked_profile() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::in_memory()
                .await
                .expect("in-memory database should open"),
        );
        let user = storage
            .create_user(teacher_request("teacher2"))
            .await
            .unwrap();
        assert_eq!(get::linked_profile(&storage, &user).await.unwrap(), None);

        let teacher = storage
            .create_teacher(crate::models::teachers::requests::CreateTeacherRequest {
                teacher_code: "T002".to_string(),
                full_name: "Grace".to_string(),
                email: None,
                phone: None,
                user_id: Some(user.id),
                subject_ids: vec![],
            })
            .await
            .unwrap();

        assert_eq!(
            get::linked_profile(&storage, &user).await.unwrap(),
            Some(crate::models::users::responses::LinkedProfile::Teacher(
                teacher.teacher.id
            ))
        );
    }
}
