pub mod check_in;
pub mod query;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceQueryParams, AttendanceSummaryParams, BulkAttendanceRequest, CheckInRequest,
    RecordAttendanceRequest, UpdateAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
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

    // 手工记录单条考勤
    pub async fn record_attendance(
        &self,
        req: RecordAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_attendance(self, req, request).await
    }

    // 按课点名
    pub async fn bulk_record(
        &self,
        req: BulkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::bulk_record(self, req, request).await
    }

    // RFID 刷卡签到
    pub async fn check_in(
        &self,
        req: CheckInRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        check_in::check_in(self, req, chrono::Local::now().naive_local(), request).await
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::list_attendance(self, query, request).await
    }

    pub async fn summary(
        &self,
        params: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::summary(self, params, request).await
    }

    pub async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::update_attendance(self, id, update, request).await
    }

    pub async fn delete_attendance(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::delete_attendance(self, id, request).await
    }
}

#[cfg(test)]
mod tests;
