//! 学期管理
//!
//! 日期以 "YYYY-MM-DD" 存储，开始日期不得晚于结束日期。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    semesters::requests::{CreateSemesterRequest, SemesterQueryParams, UpdateSemesterRequest},
};
use crate::storage::Storage;
use crate::utils::dates::parse_date;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct SemesterService {
    storage: Option<Arc<dyn Storage>>,
}

/// 校验日期格式与先后顺序
pub(crate) fn check_date_range(start: &str, end: &str) -> Result<(), String> {
    let start_date = parse_date(start).map_err(|e| e.message().to_string())?;
    let end_date = parse_date(end).map_err(|e| e.message().to_string())?;
    if start_date > end_date {
        return Err(format!("start_date {start} is after end_date {end}"));
    }
    Ok(())
}

impl SemesterService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_semester(
        &self,
        req: CreateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if req.name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::SemesterInvalid, "Semester name is required"));
        }
        if let Err(msg) = check_date_range(&req.start_date, &req.end_date) {
            return Ok(bad_request(ErrorCode::SemesterInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_semester(req).await {
            Ok(semester) => Ok(HttpResponse::Created().json(ApiResponse::success(
                semester,
                "Semester created successfully",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::SemesterInvalid,
                "Semester already exists",
                "Semester creation failed",
            )),
        }
    }

    pub async fn list_semesters(
        &self,
        query: SemesterQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_semesters_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Semester list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve semester list")),
        }
    }

    pub async fn get_semester(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_semester_by_id(id).await {
            Ok(Some(semester)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                semester,
                "Semester retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve semester")),
        }
    }

    pub async fn update_semester(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        // 只改一端日期时与已有值合并校验
        if update.start_date.is_some() || update.end_date.is_some() {
            let current = match storage.get_semester_by_id(id).await {
                Ok(Some(semester)) => semester,
                Ok(None) => return Ok(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
                Err(e) => return Ok(query_failed(e, "Failed to retrieve semester")),
            };
            let start = update.start_date.as_deref().unwrap_or(&current.start_date);
            let end = update.end_date.as_deref().unwrap_or(&current.end_date);
            if let Err(msg) = check_date_range(start, end) {
                return Ok(bad_request(ErrorCode::SemesterInvalid, msg));
            }
        }

        match storage.update_semester(id, update).await {
            Ok(Some(semester)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                semester,
                "Semester updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::SemesterInvalid,
                "Semester already exists",
                "Semester update failed",
            )),
        }
    }

    pub async fn delete_semester(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_semester(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Semester deleted successfully"))),
            Ok(false) => Ok(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
            Err(e) => Ok(delete_failed(e, "Semester deletion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::check_date_range;

    #[test]
    fn test_semester_date_range() {
        assert!(check_date_range("2026-09-07", "2027-01-15").is_ok());
        assert!(check_date_range("2026-09-07", "2026-09-07").is_ok());
        assert!(check_date_range("2027-01-15", "2026-09-07").is_err());
        assert!(check_date_range("2026-13-01", "2027-01-15").is_err());
    }
}
