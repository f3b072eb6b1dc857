use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::NotificationService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::{
        entities::{NewNotification, NotificationTarget},
        requests::CreateNotificationRequest,
        responses::CreateNotificationResponse,
    },
};
use crate::services::{bad_request, not_found, query_failed, write_failed};
use crate::storage::Storage;

const MAX_TITLE_LEN: usize = 200;

/// 展开接收对象为去重后的用户ID
async fn resolve_recipients(
    storage: &Arc<dyn Storage>,
    target: &NotificationTarget,
) -> Result<Vec<i64>, HttpResponse> {
    let mut user_ids = match target {
        NotificationTarget::Users { user_ids } => user_ids.clone(),
        NotificationTarget::Role { role } => storage
            .list_user_ids_by_role(*role)
            .await
            .map_err(|e| query_failed(e, "Failed to resolve role recipients"))?,
        NotificationTarget::Class {
            class_id,
            include_parents,
        } => {
            match storage.get_class_by_id(*class_id).await {
                Ok(Some(_)) => {}
                Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
                Err(e) => return Err(query_failed(e, "Failed to retrieve class")),
            }
            storage
                .list_class_recipient_user_ids(*class_id, *include_parents)
                .await
                .map_err(|e| query_failed(e, "Failed to resolve class recipients"))?
        }
    };
    user_ids.sort_unstable();
    user_ids.dedup();
    Ok(user_ids)
}

pub async fn create_notification(
    service: &NotificationService,
    req: CreateNotificationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let title = req.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Ok(bad_request(
            ErrorCode::NotificationInvalid,
            format!("Title must be 1-{MAX_TITLE_LEN} characters"),
        ));
    }

    let storage = service.get_storage(request)?;
    let recipients = match resolve_recipients(&storage, &req.target).await {
        Ok(ids) => ids,
        Err(resp) => return Ok(resp),
    };
    if recipients.is_empty() {
        return Ok(bad_request(
            ErrorCode::NotificationInvalid,
            "Notification has no recipients",
        ));
    }

    let notification = NewNotification {
        notification_type: req.notification_type,
        title: title.to_string(),
        content: req.content,
        reference_type: req.reference_type,
        reference_id: req.reference_id,
        created_by: RequireJWT::extract_user_id(request),
    };

    match storage.create_notifications(&recipients, notification).await {
        Ok(count) => {
            info!("Notification sent to {} recipients", count);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreateNotificationResponse {
                    recipients: count as i64,
                },
                "Notification sent successfully",
            )))
        }
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::NotificationInvalid,
            "Notification could not be delivered",
            "Notification creation failed",
        )),
    }
}
