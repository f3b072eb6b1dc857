use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::{ClassListQuery, ClassQueryParams},
    users::entities::UserRole,
};
use crate::services::query_failed;

pub async fn list_classes(
    service: &ClassService,
    query: ClassQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let mut list_query: ClassListQuery = query.into();

    // 教师按班主任过滤，忽略请求中的 homeroom_teacher_id
    if RequireJWT::extract_user_role(request) == Some(UserRole::Teacher) {
        let user_id = RequireJWT::extract_user_id(request).unwrap_or_default();
        match storage.get_teacher_by_user_id(user_id).await {
            Ok(Some(teacher)) => list_query.homeroom_teacher_id = Some(teacher.id),
            Ok(None) => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::TeacherNotFound,
                    "No teacher profile is linked to this account",
                )));
            }
            Err(e) => return Ok(query_failed(e, "Failed to resolve teacher profile")),
        }
    }

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve class list")),
    }
}
