pub mod access;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{CreateStudentRequest, StudentQueryParams, UpdateStudentRequest},
};
use crate::storage::Storage;
use crate::utils::dates::parse_date;
use crate::utils::validate::{validate_code, validate_email};

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

/// 校验学生档案中的可选字段
fn check_profile(
    email: Option<&str>,
    date_of_birth: Option<&str>,
    enrolled_at: Option<&str>,
) -> Result<(), String> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    for date in [date_of_birth, enrolled_at].into_iter().flatten() {
        parse_date(date).map_err(|e| e.message().to_string())?;
    }
    Ok(())
}

impl StudentService {
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

    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(msg) = validate_code(&req.student_code) {
            return Ok(bad_request(ErrorCode::StudentInvalid, msg));
        }
        if req.full_name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::StudentInvalid, "Full name is required"));
        }
        if let Err(msg) = check_profile(
            req.email.as_deref(),
            req.date_of_birth.as_deref(),
            req.enrolled_at.as_deref(),
        ) {
            return Ok(bad_request(ErrorCode::StudentInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_student(req).await {
            Ok(student) => {
                info!("Enrolled student {}", student.student_code);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    student,
                    "Student created successfully",
                )))
            }
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::StudentAlreadyExists,
                "Student code or linked account already in use",
                "Student creation failed",
            )),
        }
    }

    pub async fn list_students(
        &self,
        query: StudentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_students_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Student list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve student list")),
        }
    }

    // 学生本人与已关联的家长也可查看
    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        if let Some(user) = RequireJWT::extract_user_claims(request)
            && let Err(response) = access::ensure_student_visible(&storage, &user, id).await
        {
            return Ok(response);
        }

        match storage.get_student_detail(id).await {
            Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Student retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve student")),
        }
    }

    pub async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(ref name) = update.full_name
            && name.trim().is_empty()
        {
            return Ok(bad_request(ErrorCode::StudentInvalid, "Full name is required"));
        }
        if let Err(msg) = check_profile(
            update.email.as_deref(),
            update.date_of_birth.as_deref(),
            None,
        ) {
            return Ok(bad_request(ErrorCode::StudentInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_student(id, update).await {
            Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::StudentAlreadyExists,
                "Linked account already in use",
                "Student update failed",
            )),
        }
    }

    pub async fn delete_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_student(id).await {
            Ok(true) => Ok(
                HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully"))
            ),
            Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => Ok(delete_failed(e, "Student deletion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{HttpMessage, http::StatusCode, test::TestRequest};

    fn account(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn student_request(code: &str, user_id: Option<i64>) -> CreateStudentRequest {
        CreateStudentRequest {
            student_code: code.to_string(),
            full_name: format!("Student {code}"),
            gender: None,
            date_of_birth: Some("2010-04-01".to_string()),
            email: None,
            phone: None,
            address: None,
            class_id: None,
            batch_id: None,
            user_id,
            enrolled_at: None,
        }
    }

    #[test]
    fn test_profile_checks() {
        assert!(check_profile(Some("kid@school.test"), Some("2010-04-01"), None).is_ok());
        assert!(check_profile(Some("not-an-email"), None, None).is_err());
        assert!(check_profile(None, Some("01/04/2010"), None).is_err());
    }

    #[actix_web::test]
    async fn test_students_only_see_themselves() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::in_memory()
                .await
                .expect("in-memory database should open"),
        );
        let login = storage
            .create_user(CreateUserRequest {
                username: "alice".to_string(),
                email: "alice@school.test".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Student,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        let alice = storage
            .create_student(student_request("S001", Some(login.id)))
            .await
            .unwrap();
        let bob = storage
            .create_student(student_request("S002", None))
            .await
            .unwrap();

        let service = StudentService::with_storage(storage);
        let request = TestRequest::default().to_http_request();
        request
            .extensions_mut()
            .insert(account(login.id, UserRole::Student));

        let own = service.get_student(alice.id, &request).await.unwrap();
        assert_eq!(own.status(), StatusCode::OK);

        let other = service.get_student(bob.id, &request).await.unwrap();
        assert_eq!(other.status(), StatusCode::FORBIDDEN);
    }
}
