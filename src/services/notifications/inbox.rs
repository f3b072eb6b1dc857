use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::{
        requests::NotificationQueryParams,
        responses::{MarkAllReadResponse, UnreadCountResponse},
    },
};
use crate::services::{not_found, query_failed};

pub async fn list_notifications(
    service: &NotificationService,
    user_id: i64,
    query: NotificationQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage
        .list_notifications_with_pagination(user_id, query.into())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve notifications")),
    }
}

pub async fn get_unread_count(
    service: &NotificationService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_unread_notification_count(user_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count,
            },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to count unread notifications")),
    }
}

pub async fn mark_as_read(
    service: &NotificationService,
    id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.mark_notification_as_read(id, user_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Notification marked as read",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )),
        Err(e) => Ok(query_failed(e, "Failed to mark notification as read")),
    }
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.mark_all_notifications_as_read(user_id).await {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to mark notifications as read")),
    }
}

pub async fn delete_notification(
    service: &NotificationService,
    id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_notification(id, user_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Notification deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        )),
        Err(e) => Ok(query_failed(e, "Failed to delete notification")),
    }
}
