use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    parents::requests::{
        CreateParentRequest, LinkStudentRequest, ParentQueryParams, UpdateParentRequest,
    },
    users::entities::UserRole,
};
use crate::storage::Storage;
use crate::utils::validate::validate_email;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct ParentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_parent(
        &self,
        req: CreateParentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if req.full_name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::BadRequest, "Full name is required"));
        }
        if let Some(ref email) = req.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_parent(req).await {
            Ok(parent) => Ok(HttpResponse::Created().json(ApiResponse::success(
                parent,
                "Parent created successfully",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::Conflict,
                "Linked account already in use",
                "Parent creation failed",
            )),
        }
    }

    pub async fn list_parents(
        &self,
        query: ParentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_parents_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Parent list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve parent list")),
        }
    }

    // 家长详情，附带已关联子女；家长账号只能查看自己
    pub async fn get_parent(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        let detail = match storage.get_parent_detail(id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => return Ok(not_found(ErrorCode::ParentNotFound, "Parent not found")),
            Err(e) => return Ok(query_failed(e, "Failed to retrieve parent")),
        };

        if RequireJWT::extract_user_role(request) == Some(UserRole::Parent)
            && detail.parent.user_id != RequireJWT::extract_user_id(request)
        {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You do not have access to this parent",
            )));
        }

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Parent retrieved successfully",
        )))
    }

    pub async fn update_parent(
        &self,
        id: i64,
        update: UpdateParentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(ref email) = update.email
            && let Err(msg) = validate_email(email)
        {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_parent(id, update).await {
            Ok(Some(parent)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                parent,
                "Parent updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::ParentNotFound, "Parent not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::Conflict,
                "Linked account already in use",
                "Parent update failed",
            )),
        }
    }

    pub async fn delete_parent(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_parent(id).await {
            Ok(true) => Ok(
                HttpResponse::Ok().json(ApiResponse::success_empty("Parent deleted successfully"))
            ),
            Ok(false) => Ok(not_found(ErrorCode::ParentNotFound, "Parent not found")),
            Err(e) => Ok(delete_failed(e, "Parent deletion failed")),
        }
    }

    // 关联子女
    pub async fn link_student(
        &self,
        parent_id: i64,
        req: LinkStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let relationship = req.relationship.trim();
        if relationship.is_empty() || relationship.len() > 32 {
            return Ok(bad_request(
                ErrorCode::BadRequest,
                "Relationship must be 1-32 characters",
            ));
        }

        let storage = self.get_storage(request)?;

        match storage.get_parent_by_id(parent_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::ParentNotFound, "Parent not found")),
            Err(e) => return Ok(query_failed(e, "Failed to retrieve parent")),
        }
        match storage.get_student_by_id(req.student_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => return Ok(query_failed(e, "Failed to retrieve student")),
        }

        match storage
            .link_parent_student(parent_id, req.student_id, relationship)
            .await
        {
            Ok(true) => {
                info!("Linked parent {} to student {}", parent_id, req.student_id);
                Ok(HttpResponse::Created()
                    .json(ApiResponse::success_empty("Student linked successfully")))
            }
            Ok(false) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ParentLinkExists,
                "Student is already linked to this parent",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::ParentLinkExists,
                "Student is already linked to this parent",
                "Linking student failed",
            )),
        }
    }

    pub async fn unlink_student(
        &self,
        parent_id: i64,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.unlink_parent_student(parent_id, student_id).await {
            Ok(true) => Ok(
                HttpResponse::Ok().json(ApiResponse::success_empty("Student unlinked successfully"))
            ),
            Ok(false) => Ok(not_found(ErrorCode::NotFound, "Link not found")),
            Err(e) => Ok(query_failed(e, "Unlinking student failed")),
        }
    }
}
