use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    rfid::requests::{AssignRfidRequest, RfidQueryParams},
};
use crate::storage::Storage;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

const MAX_TAG_LEN: usize = 64;

pub struct RfidService {
    storage: Option<Arc<dyn Storage>>,
}

/// 卡号只允许可打印的 ASCII 字符
fn check_tag(tag: &str) -> Result<(), &'static str> {
    if tag.is_empty() {
        return Err("RFID tag is required");
    }
    if tag.len() > MAX_TAG_LEN {
        return Err("RFID tag is too long");
    }
    if !tag.chars().all(|c| c.is_ascii_graphic()) {
        return Err("RFID tag contains invalid characters");
    }
    Ok(())
}

impl RfidService {
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

    pub async fn assign_card(
        &self,
        req: AssignRfidRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let tag = req.tag.trim();
        if let Err(msg) = check_tag(tag) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.get_student_by_id(req.student_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => return Ok(query_failed(e, "Failed to retrieve student")),
        }

        match storage.create_rfid_card(tag, req.student_id).await {
            Ok(card) => {
                info!("RFID card {} assigned to student {}", card.tag, card.student_id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    card,
                    "RFID card assigned successfully",
                )))
            }
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::RfidCardAlreadyExists,
                "RFID tag is already assigned",
                "RFID card assignment failed",
            )),
        }
    }

    pub async fn list_cards(
        &self,
        query: RfidQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_rfid_cards_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "RFID card list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve RFID card list")),
        }
    }

    pub async fn get_card(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_rfid_card_by_id(id).await {
            Ok(Some(card)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                card,
                "RFID card retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::RfidCardNotFound, "RFID card not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve RFID card")),
        }
    }

    // 停用后保留记录，刷卡会被拒绝
    pub async fn deactivate_card(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.deactivate_rfid_card(id).await {
            Ok(Some(card)) => {
                info!("RFID card {} deactivated", card.tag);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    card,
                    "RFID card deactivated successfully",
                )))
            }
            Ok(None) => Ok(not_found(ErrorCode::RfidCardNotFound, "RFID card not found")),
            Err(e) => Ok(query_failed(e, "RFID card deactivation failed")),
        }
    }

    pub async fn delete_card(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_rfid_card(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "RFID card deleted successfully",
            ))),
            Ok(false) => Ok(not_found(ErrorCode::RfidCardNotFound, "RFID card not found")),
            Err(e) => Ok(delete_failed(e, "RFID card deletion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{http::StatusCode, test::TestRequest};

    #[test]
    fn test_check_tag() {
        assert!(check_tag("04A2B9C1").is_ok());
        assert!(check_tag("").is_err());
        assert!(check_tag("04 A2").is_err());
        assert!(check_tag(&"F".repeat(MAX_TAG_LEN + 1)).is_err());
    }

    #[actix_web::test]
    async fn test_tag_is_unique() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::in_memory()
                .await
                .expect("in-memory database should open"),
        );
        let student = storage
            .create_student(CreateStudentRequest {
                student_code: "S001".to_string(),
                full_name: "Student S001".to_string(),
                gender: None,
                date_of_birth: None,
                email: None,
                phone: None,
                address: None,
                class_id: None,
                batch_id: None,
                user_id: None,
                enrolled_at: None,
            })
            .await
            .unwrap();

        let service = RfidService::with_storage(storage);
        let request = TestRequest::default().to_http_request();
        let assign = |student_id| AssignRfidRequest {
            tag: "04A2B9C1".to_string(),
            student_id,
        };

        let first = service.assign_card(assign(student.id), &request).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let again = service.assign_card(assign(student.id), &request).await.unwrap();
        assert_eq!(again.status(), StatusCode::CONFLICT);

        let missing = service.assign_card(assign(9_999), &request).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
