use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{requests::WeeklyScheduleParams, responses::WeeklyScheduleResponse},
    users::entities::UserRole,
};
use crate::services::{bad_request, query_failed};
use crate::utils::dates::{format_date, parse_date, week_bounds};

pub async fn weekly_schedule(
    service: &ScheduleService,
    params: WeeklyScheduleParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let date = match params.date.as_deref() {
        Some(value) => match parse_date(value) {
            Ok(date) => date,
            Err(e) => return Ok(bad_request(ErrorCode::ScheduleInvalid, e.message())),
        },
        None => chrono::Local::now().date_naive(),
    };

    let storage = service.get_storage(request)?;
    let mut class_id = params.class_id;
    let mut teacher_id = params.teacher_id;

    // 未指定时按当前账号推断：学生看本班，教师看自己
    if class_id.is_none() && teacher_id.is_none() {
        let user_id = RequireJWT::extract_user_id(request).unwrap_or_default();
        match RequireJWT::extract_user_role(request) {
            Some(UserRole::Student) => match storage.get_student_by_user_id(user_id).await {
                Ok(student) => class_id = student.and_then(|s| s.class_id),
                Err(e) => return Ok(query_failed(e, "Failed to resolve student profile")),
            },
            Some(UserRole::Teacher) => match storage.get_teacher_by_user_id(user_id).await {
                Ok(teacher) => teacher_id = teacher.map(|t| t.id),
                Err(e) => return Ok(query_failed(e, "Failed to resolve teacher profile")),
            },
            _ => {}
        }
    }

    if class_id.is_none() && teacher_id.is_none() {
        return Ok(bad_request(
            ErrorCode::ScheduleInvalid,
            "Either class_id or teacher_id is required",
        ));
    }

    let (week_start, week_end) = week_bounds(date);
    let (week_start, week_end) = (format_date(week_start), format_date(week_end));

    match storage
        .list_schedule_entries_in_range(class_id, teacher_id, &week_start, &week_end)
        .await
    {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            WeeklyScheduleResponse {
                week_start,
                week_end,
                entries,
            },
            "Weekly schedule retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve weekly schedule")),
    }
}
