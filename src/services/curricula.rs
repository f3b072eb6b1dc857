//! 教学大纲管理
//!
//! 每门科目每周课时必须为正，同一大纲内科目不可重复，
//! 每周总课时不能超过课表网格容量。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    curricula::{
        entities::CurriculumSubject,
        requests::{CreateCurriculumRequest, CurriculumQueryParams, UpdateCurriculumRequest},
    },
};
use crate::storage::Storage;

use super::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub struct CurriculumService {
    storage: Option<Arc<dyn Storage>>,
}

pub(crate) fn check_subject_lines(
    subjects: &[CurriculumSubject],
    weekly_capacity: u32,
) -> Result<(), String> {
    let mut seen = HashSet::new();
    for line in subjects {
        if line.sessions_per_week <= 0 {
            return Err(format!(
                "sessions_per_week for subject {} must be positive",
                line.subject_id
            ));
        }
        if !seen.insert(line.subject_id) {
            return Err(format!("Subject {} is listed twice", line.subject_id));
        }
    }

    let total: i64 = subjects.iter().map(|s| s.sessions_per_week as i64).sum();
    if total > weekly_capacity as i64 {
        return Err(format!(
            "Curriculum needs {total} sessions per week but the timetable only has {weekly_capacity} slots"
        ));
    }
    Ok(())
}

fn weekly_capacity() -> u32 {
    let schedule = &AppConfig::get().schedule;
    schedule.days_per_week * schedule.periods_per_day
}

impl CurriculumService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_curriculum(
        &self,
        req: CreateCurriculumRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if req.name.trim().is_empty() {
            return Ok(bad_request(ErrorCode::CurriculumInvalid, "Name is required"));
        }
        if let Err(msg) = super::classes::check_grade(req.grade) {
            return Ok(bad_request(ErrorCode::CurriculumInvalid, msg));
        }
        if let Err(msg) = check_subject_lines(&req.subjects, weekly_capacity()) {
            return Ok(bad_request(ErrorCode::CurriculumInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_curriculum(req).await {
            Ok(curriculum) => Ok(HttpResponse::Created().json(ApiResponse::success(
                curriculum,
                "Curriculum created successfully",
            ))),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::CurriculumInvalid,
                "Curriculum already exists",
                "Curriculum creation failed",
            )),
        }
    }

    pub async fn list_curricula(
        &self,
        query: CurriculumQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_curricula_with_pagination(query.into()).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Curriculum list retrieved successfully",
            ))),
            Err(e) => Ok(query_failed(e, "Failed to retrieve curriculum list")),
        }
    }

    pub async fn get_curriculum(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_curriculum_by_id(id).await {
            Ok(Some(curriculum)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                curriculum,
                "Curriculum retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::CurriculumNotFound, "Curriculum not found")),
            Err(e) => Ok(query_failed(e, "Failed to retrieve curriculum")),
        }
    }

    pub async fn update_curriculum(
        &self,
        id: i64,
        update: UpdateCurriculumRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        if let Some(grade) = update.grade
            && let Err(msg) = super::classes::check_grade(grade)
        {
            return Ok(bad_request(ErrorCode::CurriculumInvalid, msg));
        }
        if let Some(ref subjects) = update.subjects
            && let Err(msg) = check_subject_lines(subjects, weekly_capacity())
        {
            return Ok(bad_request(ErrorCode::CurriculumInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_curriculum(id, update).await {
            Ok(Some(curriculum)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                curriculum,
                "Curriculum updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::CurriculumNotFound, "Curriculum not found")),
            Err(e) => Ok(write_failed(
                e,
                ErrorCode::CurriculumInvalid,
                "Curriculum already exists",
                "Curriculum update failed",
            )),
        }
    }

    pub async fn delete_curriculum(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_curriculum(id).await {
            Ok(true) => Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Curriculum deleted successfully"))),
            Ok(false) => Ok(not_found(ErrorCode::CurriculumNotFound, "Curriculum not found")),
            Err(e) => Ok(delete_failed(e, "Curriculum deletion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(subject_id: i64, sessions_per_week: i32) -> CurriculumSubject {
        CurriculumSubject {
            subject_id,
            sessions_per_week,
        }
    }

    #[test]
    fn test_subject_lines_validation() {
        assert!(check_subject_lines(&[line(1, 5), line(2, 3)], 40).is_ok());
        assert!(check_subject_lines(&[], 40).is_ok());
        assert!(check_subject_lines(&[line(1, 0)], 40).is_err());
        assert!(check_subject_lines(&[line(1, 2), line(1, 3)], 40).is_err());
    }

    #[test]
    fn test_weekly_total_must_fit_grid() {
        assert!(check_subject_lines(&[line(1, 20), line(2, 20)], 40).is_ok());
        let err = check_subject_lines(&[line(1, 30), line(2, 11)], 40).unwrap_err();
        assert!(err.contains("41"));
    }
}
