use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    classrooms::requests::{ClassroomQueryParams, CreateClassroomRequest, UpdateClassroomRequest},
};
use crate::storage::Storage;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct ClassroomService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassroomService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_classroom(
        &self,
        req: CreateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if req.name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::BadRequest, "Classroom name is required"));
        }
        if req.capacity <= 0 {
            return Ok(bad_request(ErrorCode::BadRequest, "Capacity must be positive"));
        }

        let storage = self.get_storage(request)?;
        match storage.create_classroom(req).await {
            Ok(classroom) => Ok(HttpResponse::Created().json(ApiResponse::success(
                classroom,
                "Classroom created successfully",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::ClassroomAlreadyExists,
                "Classroom name already exists",
                "Classroom creation failed",
            )),
        }
    }

    pub async fn list_classrooms(
        &self,
        query: ClassroomQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_classrooms_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Classroom list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve classroom list")),
        }
    }

    pub async fn get_classroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_classroom_by_id(id).await {
            Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                classroom,
                "Classroom retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve classroom")),
        }
    }

    pub async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(capacity) = update.capacity
            && capacity <= 0
        {
            return Ok(bad_request(ErrorCode::BadRequest, "Capacity must be positive"));
        }

        let storage = self.get_storage(request)?;
        match storage.update_classroom(id, update).await {
            Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                classroom,
                "Classroom updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::ClassroomAlreadyExists,
                "Classroom name already exists",
                "Classroom update failed",
            )),
        }
    }

    pub async fn delete_classroom(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_classroom(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Classroom deleted successfully"))),
            Ok(false) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
            Err(e) => Ok(delete_failed(e, "Classroom deletion failed")),
        }
    }
}
