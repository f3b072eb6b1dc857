use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_grade};
use crate::models::{ApiResponse, ErrorCode, classes::requests::CreateClassRequest};
use crate::services::{bad_request, write_failed};

pub async fn create_class(
    service: &ClassService,
    class_data: CreateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if class_data.class_name.trim().is_empty() {
        return Ok(bad_request(ErrorCode::ClassInvalid, "Class name is required"));
    }
    if let Err(msg) = check_grade(class_data.grade) {
        return Ok(bad_request(ErrorCode::ClassInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Created class {} (grade {})", class.class_name, class.grade);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                class,
                "Class created successfully",
            )))
        }
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::ClassAlreadyExists,
            "Class name already exists",
            "Class creation failed",
        )),
    }
}
