pub mod create;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::batches::requests::{BatchQueryParams, CreateBatchRequest, UpdateBatchRequest};
use crate::storage::Storage;

pub struct BatchService {
    storage: Option<Arc<dyn Storage>>,
}

impl BatchService {
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

    // 创建届次（已存在则返回已有记录）
    pub async fn create_batch(
        &self,
        req: CreateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_batch(self, req, request).await
    }

    pub async fn list_batches(
        &self,
        query: BatchQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_batches(self, query, request).await
    }

    // 届次详情，附带所属班级
    pub async fn get_batch(&self, batch_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_batch(self, batch_id, request).await
    }

    pub async fn update_batch(
        &self,
        batch_id: i64,
        update: UpdateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_batch(self, batch_id, update, request).await
    }

    pub async fn delete_batch(
        &self,
        batch_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_batch(self, batch_id, request).await
    }
}

/// 毕业年份必须晚于入学年份
pub(crate) fn check_year_range(start_year: i32, end_year: i32) -> Result<(), String> {
    if end_year <= start_year {
        return Err(format!(
            "end_year ({end_year}) must be after start_year ({start_year})"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{body::to_bytes, http::StatusCode, test::TestRequest};

    async fn service() -> BatchService {
        let storage = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open");
        BatchService::with_storage(Arc::new(storage))
    }

    fn request(start_year: i32, end_year: i32) -> CreateBatchRequest {
        CreateBatchRequest {
            batch_code: None,
            name: None,
            start_year,
            end_year,
            description: None,
        }
    }

    #[test]
    fn test_year_range() {
        assert!(check_year_range(2024, 2027).is_ok());
        assert!(check_year_range(2024, 2024).is_err());
        assert!(check_year_range(2027, 2024).is_err());
    }

    #[actix_web::test]
    async fn test_create_is_idempotent_by_code() {
        let service = service().await;
        let http = TestRequest::default().to_http_request();

        let first = service
            .create_batch(request(2024, 2027), &http)
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = service
            .create_batch(request(2024, 2027), &http)
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        let body = to_bytes(second.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["is_new"], false);
        assert_eq!(json["data"]["batch"]["batch_code"], "2024-2027");
    }

    #[actix_web::test]
    async fn test_inverted_years_are_rejected() {
        let service = service().await;
        let http = TestRequest::default().to_http_request();

        let resp = service
            .create_batch(request(2027, 2024), &http)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
