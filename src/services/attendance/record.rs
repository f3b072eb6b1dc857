use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceMethod, NewAttendance},
        requests::{BulkAttendanceRequest, RecordAttendanceRequest},
        responses::BulkAttendanceResponse,
    },
};
use crate::services::{bad_request, not_found, query_failed, write_failed};
use crate::utils::dates::{format_date, parse_date};

fn already_recorded() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::AttendanceAlreadyRecorded,
        "Attendance already recorded",
    ))
}

pub async fn record_attendance(
    service: &AttendanceService,
    req: RecordAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let student = match storage.get_student_by_id(req.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve student")),
    };

    // 记到某节课上时日期和班级以课表为准
    let (attendance_date, class_id) = match req.schedule_id {
        Some(schedule_id) => {
            let schedule = match storage.get_schedule_by_id(schedule_id).await {
                Ok(Some(schedule)) => schedule,
                Ok(None) => {
                    return Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found"));
                }
                Err(e) => return Ok(query_failed(e, "Failed to retrieve schedule")),
            };
            if student.class_id != Some(schedule.class_id) {
                return Ok(bad_request(
                    ErrorCode::AttendanceInvalid,
                    "Student does not belong to the scheduled class",
                ));
            }
            if schedule.is_free_time {
                return Ok(bad_request(
                    ErrorCode::AttendanceInvalid,
                    "Cannot record attendance for free time",
                ));
            }
            (schedule.schedule_date, Some(schedule.class_id))
        }
        None => {
            let date = match req.attendance_date.as_deref() {
                Some(value) => match parse_date(value) {
                    Ok(date) => format_date(date),
                    Err(e) => return Ok(bad_request(ErrorCode::AttendanceInvalid, e.message())),
                },
                None => format_date(chrono::Local::now().date_naive()),
            };
            (date, student.class_id)
        }
    };

    match storage
        .find_attendance(student.id, &attendance_date, req.schedule_id)
        .await
    {
        Ok(Some(_)) => return Ok(already_recorded()),
        Ok(None) => {}
        Err(e) => return Ok(query_failed(e, "Failed to check attendance")),
    }

    let record = NewAttendance {
        student_id: student.id,
        class_id,
        schedule_id: req.schedule_id,
        attendance_date,
        status: req.status,
        method: AttendanceMethod::Manual,
        check_in_at: None,
        note: req.note,
        recorded_by: RequireJWT::extract_user_id(request),
    };

    match storage.create_attendance(record).await {
        Ok(log) => Ok(HttpResponse::Created().json(ApiResponse::success(
            log,
            "Attendance recorded successfully",
        ))),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::AttendanceAlreadyRecorded,
            "Attendance already recorded",
            "Attendance recording failed",
        )),
    }
}

pub async fn bulk_record(
    service: &AttendanceService,
    req: BulkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.entries.is_empty() {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalid,
            "At least one attendance entry is required",
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = req.entries.iter().find(|e| !seen.insert(e.student_id)) {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalid,
            format!("Student {} appears more than once", dup.student_id),
        ));
    }

    let storage = service.get_storage(request)?;

    let schedule = match storage.get_schedule_by_id(req.schedule_id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve schedule")),
    };
    if schedule.is_free_time {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalid,
            "Cannot record attendance for free time",
        ));
    }

    // 点名名单只能是本班学生
    let roster: HashSet<i64> = match storage.list_students_by_class(schedule.class_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(query_failed(e, "Failed to load class roster")),
    };
    if let Some(outsider) = req.entries.iter().find(|e| !roster.contains(&e.student_id)) {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalid,
            format!(
                "Student {} does not belong to the scheduled class",
                outsider.student_id
            ),
        ));
    }

    let recorded_by = RequireJWT::extract_user_id(request);
    let records = req
        .entries
        .into_iter()
        .map(|entry| NewAttendance {
            student_id: entry.student_id,
            class_id: Some(schedule.class_id),
            schedule_id: Some(schedule.id),
            attendance_date: schedule.schedule_date.clone(),
            status: entry.status,
            method: AttendanceMethod::Manual,
            check_in_at: None,
            note: entry.note,
            recorded_by,
        })
        .collect();

    match storage.upsert_attendance_batch(records).await {
        Ok((created, updated)) => {
            info!(
                "Roll call for schedule {}: {} created, {} updated",
                schedule.id, created, updated
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BulkAttendanceResponse { created, updated },
                "Attendance saved successfully",
            )))
        }
        Err(e) => Ok(query_failed(e, "Bulk attendance failed")),
    }
}
