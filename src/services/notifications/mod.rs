pub mod create;
pub mod inbox;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::requests::{CreateNotificationRequest, NotificationQueryParams},
};
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
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

    pub async fn create_notification(
        &self,
        req: CreateNotificationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_notification(self, req, request).await
    }

    pub async fn list_notifications(
        &self,
        query: NotificationQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        match current_user_id(request) {
            Ok(user_id) => inbox::list_notifications(self, user_id, query, request).await,
            Err(resp) => Ok(resp),
        }
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match current_user_id(request) {
            Ok(user_id) => inbox::get_unread_count(self, user_id, request).await,
            Err(resp) => Ok(resp),
        }
    }

    pub async fn mark_as_read(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match current_user_id(request) {
            Ok(user_id) => inbox::mark_as_read(self, id, user_id, request).await,
            Err(resp) => Ok(resp),
        }
    }

    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match current_user_id(request) {
            Ok(user_id) => inbox::mark_all_as_read(self, user_id, request).await,
            Err(resp) => Ok(resp),
        }
    }

    pub async fn delete_notification(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        match current_user_id(request) {
            Ok(user_id) => inbox::delete_notification(self, id, user_id, request).await,
            Err(resp) => Ok(resp),
        }
    }
}

// 通知只对接收人本人可见
fn current_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

#[cfg(test)]
mod tests;
