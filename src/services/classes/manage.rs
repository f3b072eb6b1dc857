use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_grade};
use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::services::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub async fn get_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_class_detail(class_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Class retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(query_failed(e, "Failed to retrieve class")),
    }
}

pub async fn update_class(
    service: &ClassService,
    class_id: i64,
    update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = update_data.class_name
        && name.trim().is_empty()
    {
        return Ok(bad_request(ErrorCode::ClassInvalid, "Class name is required"));
    }
    if let Some(grade) = update_data.grade
        && let Err(msg) = check_grade(grade)
    {
        return Ok(bad_request(ErrorCode::ClassInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::ClassAlreadyExists,
            "Class name already exists",
            "Class update failed",
        )),
    }
}

pub async fn delete_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_class(class_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(delete_failed(e, "Class deletion failed")),
    }
}
