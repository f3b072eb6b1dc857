use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::ScheduleService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{
        entities::{ClassSchedule, NewScheduleRow},
        requests::{CreateScheduleRequest, ScheduleQueryParams, UpdateScheduleRequest},
    },
};
use crate::services::{bad_request, delete_failed, not_found, query_failed, write_failed};
use crate::storage::{SlotQuery, Storage};
use crate::utils::dates::{parse_date, weekday_number};

/// 校验并补全一行课表：日期必须是学期内的上课日，节次在配置范围内，非自习必须有科目
async fn prepare_row(
    storage: &Arc<dyn Storage>,
    mut row: NewScheduleRow,
) -> Result<NewScheduleRow, HttpResponse> {
    let date = parse_date(&row.schedule_date)
        .map_err(|e| bad_request(ErrorCode::ScheduleInvalid, e.message()))?;

    let schedule = &AppConfig::get().schedule;
    let weekday = weekday_number(date);
    if weekday > schedule.days_per_week as i32 {
        return Err(bad_request(
            ErrorCode::ScheduleInvalid,
            format!(
                "{} is not a school day ({} days per week)",
                row.schedule_date, schedule.days_per_week
            ),
        ));
    }

    let periods_per_day = schedule.periods_per_day as i32;
    if !(1..=periods_per_day).contains(&row.period) {
        return Err(bad_request(
            ErrorCode::ScheduleInvalid,
            format!("Period must be between 1 and {periods_per_day}"),
        ));
    }

    let semester = match storage.get_semester_by_id(row.semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => return Err(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
        Err(e) => return Err(query_failed(e, "Failed to retrieve semester")),
    };
    let in_semester = match (parse_date(&semester.start_date), parse_date(&semester.end_date)) {
        (Ok(start), Ok(end)) => start <= date && date <= end,
        _ => false,
    };
    if !in_semester {
        return Err(bad_request(
            ErrorCode::ScheduleInvalid,
            format!(
                "Date {} is outside semester {} ({} to {})",
                row.schedule_date, semester.name, semester.start_date, semester.end_date
            ),
        ));
    }

    if row.is_free_time {
        row.subject_id = None;
        row.teacher_id = None;
        row.classroom_id = None;
    } else if row.subject_id.is_none() {
        return Err(bad_request(
            ErrorCode::ScheduleInvalid,
            "A lesson needs a subject; mark the slot as free time otherwise",
        ));
    }

    row.weekday = weekday;
    Ok(row)
}

/// 检查班级、教师、教室在该日该节是否已被占用
async fn check_slot(
    storage: &Arc<dyn Storage>,
    row: &NewScheduleRow,
    exclude_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let query = SlotQuery {
        schedule_date: row.schedule_date.clone(),
        period: row.period,
        class_id: Some(row.class_id),
        teacher_id: row.teacher_id,
        classroom_id: row.classroom_id,
        exclude_id,
    };

    match storage.find_slot_conflict(query).await {
        Ok(None) => Ok(()),
        Ok(Some(dimension)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ScheduleConflict,
            format!(
                "The {dimension} is already booked on {} period {}",
                row.schedule_date, row.period
            ),
        ))),
        Err(e) => Err(query_failed(e, "Failed to check schedule conflicts")),
    }
}

pub async fn list_schedules(
    service: &ScheduleService,
    query: ScheduleQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for date in [query.date_from.as_deref(), query.date_to.as_deref()]
        .into_iter()
        .flatten()
    {
        if let Err(e) = parse_date(date) {
            return Ok(bad_request(ErrorCode::ScheduleInvalid, e.message()));
        }
    }

    let storage = service.get_storage(request)?;
    match storage.list_schedules_with_pagination(query.into()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Schedule list retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve schedule list")),
    }
}

pub async fn get_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_schedule_by_id(id).await {
        Ok(Some(schedule)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            schedule,
            "Schedule retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => Ok(query_failed(e, "Failed to retrieve schedule")),
    }
}

pub async fn create_schedule(
    service: &ScheduleService,
    req: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let row = NewScheduleRow {
        semester_id: req.semester_id,
        class_id: req.class_id,
        subject_id: req.subject_id,
        teacher_id: req.teacher_id,
        classroom_id: req.classroom_id,
        schedule_date: req.schedule_date,
        weekday: 0,
        period: req.period,
        is_free_time: req.is_free_time,
        note: req.note,
    };
    let row = match prepare_row(&storage, row).await {
        Ok(row) => row,
        Err(response) => return Ok(response),
    };
    if let Err(response) = check_slot(&storage, &row, None).await {
        return Ok(response);
    }

    match storage.create_schedule(row).await {
        Ok(schedule) => {
            info!(
                "Scheduled class {} on {} period {}",
                schedule.class_id, schedule.schedule_date, schedule.period
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                schedule,
                "Schedule created successfully",
            )))
        }
        // 并发写入时由唯一索引兜底
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::ScheduleConflict,
            "The slot is already booked",
            "Schedule creation failed",
        )),
    }
}

fn merge_update(current: ClassSchedule, update: UpdateScheduleRequest) -> NewScheduleRow {
    NewScheduleRow {
        semester_id: current.semester_id,
        class_id: current.class_id,
        subject_id: update.subject_id.or(current.subject_id),
        teacher_id: update.teacher_id.unwrap_or(current.teacher_id),
        classroom_id: update.classroom_id.unwrap_or(current.classroom_id),
        schedule_date: update.schedule_date.unwrap_or(current.schedule_date),
        weekday: current.weekday,
        period: update.period.unwrap_or(current.period),
        is_free_time: update.is_free_time.unwrap_or(current.is_free_time),
        note: update.note.unwrap_or(current.note),
    }
}

pub async fn update_schedule(
    service: &ScheduleService,
    id: i64,
    update: UpdateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current = match storage.get_schedule_by_id(id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve schedule")),
    };

    let row = match prepare_row(&storage, merge_update(current, update)).await {
        Ok(row) => row,
        Err(response) => return Ok(response),
    };
    if let Err(response) = check_slot(&storage, &row, Some(id)).await {
        return Ok(response);
    }

    match storage.update_schedule(id, row).await {
        Ok(Some(schedule)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            schedule,
            "Schedule updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::ScheduleConflict,
            "The slot is already booked",
            "Schedule update failed",
        )),
    }
}

pub async fn delete_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_schedule(id).await {
        Ok(true) => Ok(
            HttpResponse::Ok().json(ApiResponse::success_empty("Schedule deleted successfully"))
        ),
        Ok(false) => Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => Ok(delete_failed(e, "Schedule deletion failed")),
    }
}
