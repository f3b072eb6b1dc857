use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    subjects::requests::{CreateSubjectRequest, SubjectQueryParams, UpdateSubjectRequest},
};
use crate::storage::Storage;
use crate::utils::validate::validate_code;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_subject(
        &self,
        req: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Err(msg) = validate_code(&req.subject_code) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        if req.name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::BadRequest, "Subject name is required"));
        }

        let storage = self.get_storage(request)?;
        match storage.create_subject(req).await {
            Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
                subject,
                "Subject created successfully",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::SubjectAlreadyExists,
                "Subject code already exists",
                "Subject creation failed",
            )),
        }
    }

    pub async fn list_subjects(
        &self,
        query: SubjectQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_subjects_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Subject list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve subject list")),
        }
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_subject_by_id(id).await {
            Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                subject,
                "Subject retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve subject")),
        }
    }

    pub async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(ref code) = update.subject_code
            && let Err(msg) = validate_code(code)
        {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_subject(id, update).await {
            Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                subject,
                "Subject updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::SubjectAlreadyExists,
                "Subject code already exists",
                "Subject update failed",
            )),
        }
    }

    pub async fn delete_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_subject(id).await {
            Ok(true) => Ok(
                HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted successfully"))
            ),
            Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => Ok(delete_failed(e, "Subject deletion failed")),
        }
    }
}
