use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    teachers::requests::{CreateTeacherRequest, TeacherQueryParams, UpdateTeacherRequest},
};
use crate::storage::Storage;
use crate::utils::validate::{validate_code, validate_email};

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_teacher(
        &self,
        mut req: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(msg) = validate_code(&req.teacher_code) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        if req.full_name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::BadRequest, "Full name is required"));
        }
        if let Some(ref email) = req.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        req.subject_ids.sort_unstable();
        req.subject_ids.dedup();

        let storage = self.get_storage(request)?;
        match storage.create_teacher(req).await {
            Ok(detail) => {
                info!("Created teacher {}", detail.teacher.teacher_code);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    detail,
                    "Teacher created successfully",
                )))
            }
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::TeacherAlreadyExists,
                "Teacher code or linked account already in use",
                "Teacher creation failed",
            )),
        }
    }

    pub async fn list_teachers(
        &self,
        query: TeacherQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_teachers_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Teacher list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve teacher list")),
        }
    }

    // 教师详情，附带可任教科目
    pub async fn get_teacher(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_teacher_detail(id).await {
            Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Teacher retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve teacher")),
        }
    }

    pub async fn update_teacher(
        &self,
        id: i64,
        mut update: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(ref email) = update.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if let Some(ref mut subject_ids) = update.subject_ids {
            subject_ids.sort_unstable();
            subject_ids.dedup();
        }

        let storage = self.get_storage(request)?;
        match storage.update_teacher(id, update).await {
            Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Teacher updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::TeacherAlreadyExists,
                "Linked account already in use",
                "Teacher update failed",
            )),
        }
    }

    pub async fn delete_teacher(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_teacher(id).await {
            Ok(true) => Ok(
                HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully"))
            ),
            Ok(false) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => Ok(delete_failed(e, "Teacher deletion failed")),
        }
    }
}
