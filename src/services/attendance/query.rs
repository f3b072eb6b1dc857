use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{
            AttendanceListQuery, AttendanceQueryParams, AttendanceSummaryParams,
            UpdateAttendanceRequest,
        },
        responses::AttendanceSummaryResponse,
    },
    users::entities::User,
};
use crate::services::students::access::{ensure_student_visible, visible_student_ids};
use crate::services::{bad_request, delete_failed, not_found, query_failed};
use crate::utils::dates::parse_date;

fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

/// 校验可选的日期区间
fn check_range(from: Option<&str>, to: Option<&str>) -> Result<(), String> {
    let from = from.map(parse_date).transpose().map_err(|e| e.message().to_string())?;
    let to = to.map(parse_date).transpose().map_err(|e| e.message().to_string())?;
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err("from must not be after to".to_string());
    }
    Ok(())
}

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_range(query.date_from.as_deref(), query.date_to.as_deref()) {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, msg));
    }

    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let mut list_query: AttendanceListQuery = query.into();
    list_query.student_ids = match visible_student_ids(&storage, &user).await {
        Ok(scope) => scope,
        Err(resp) => return Ok(resp),
    };

    match storage.list_attendance_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to list attendance")),
    }
}

pub async fn summary(
    service: &AttendanceService,
    params: AttendanceSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_range(params.from.as_deref(), params.to.as_deref()) {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, msg));
    }

    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student_ids = match params.student_id {
        Some(student_id) => {
            if let Err(resp) = ensure_student_visible(&storage, &user, student_id).await {
                return Ok(resp);
            }
            Some(vec![student_id])
        }
        // 教职工不指定学生时统计全校
        None => match visible_student_ids(&storage, &user).await {
            Ok(scope) => scope,
            Err(resp) => return Ok(resp),
        },
    };

    let counts = match storage
        .count_attendance_by_status(student_ids, params.from.clone(), params.to.clone())
        .await
    {
        Ok(counts) => counts,
        Err(e) => return Ok(query_failed(e, "Failed to summarize attendance")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSummaryResponse {
            student_id: params.student_id,
            from: params.from,
            to: params.to,
            total: counts.total(),
            present: counts.present,
            late: counts.late,
            absent: counts.absent,
            excused: counts.excused,
            attendance_rate_bp: counts.rate_basis_points(),
        },
        "Attendance summary retrieved successfully",
    )))
}

pub async fn update_attendance(
    service: &AttendanceService,
    id: i64,
    update: UpdateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update.status.is_none() && update.note.is_none() {
        return Ok(bad_request(ErrorCode::AttendanceInvalid, "Nothing to update"));
    }

    let storage = service.get_storage(request)?;
    match storage.update_attendance(id, update.status, update.note).await {
        Ok(Some(log)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            log,
            "Attendance updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found",
        )),
        Err(e) => Ok(query_failed(e, "Attendance update failed")),
    }
}

pub async fn delete_attendance(
    service: &AttendanceService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_attendance(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Attendance deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found",
        )),
        Err(e) => Ok(delete_failed(e, "Attendance deletion failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range(None, None).is_ok());
        assert!(check_range(Some("2026-09-01"), Some("2026-09-30")).is_ok());
        assert!(check_range(Some("2026-09-30"), Some("2026-09-01")).is_err());
        assert!(check_range(Some("30/09/2026"), None).is_err());
    }
}
