//! RFID 刷卡签到
//!
//! 当前节次为今天结束时间晚于此刻的最早一节；该节有课时记到这节课上，
//! 超过开始时间加宽限即为迟到。放学后或当天无课时按天记为出席。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use tracing::{info, warn};

use super::AttendanceService;
use crate::config::{AppConfig, ScheduleConfig};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceMethod, AttendanceStatus, NewAttendance},
        requests::CheckInRequest,
        responses::CheckInResponse,
    },
};
use crate::services::{bad_request, not_found, query_failed, write_failed};
use crate::utils::dates::format_date;

/// 当前所处（或即将开始）的节次及其开始时间
pub(crate) fn current_period(now: NaiveTime, config: &ScheduleConfig) -> Option<(i32, NaiveTime)> {
    let length = Duration::minutes(config.period_minutes as i64);
    config
        .period_start_times
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            NaiveTime::parse_from_str(value, "%H:%M")
                .ok()
                .map(|start| (index as i32 + 1, start))
        })
        .filter(|(_, start)| {
            let (end, wrapped) = start.overflowing_add_signed(length);
            wrapped != 0 || end > now
        })
        .min_by_key(|(_, start)| *start)
}

/// 开始时间加宽限之后刷卡记为迟到
pub(crate) fn check_in_status(now: NaiveTime, start: NaiveTime, grace_minutes: u32) -> AttendanceStatus {
    let (deadline, wrapped) = start.overflowing_add_signed(Duration::minutes(grace_minutes as i64));
    if wrapped == 0 && now > deadline {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

pub async fn check_in(
    service: &AttendanceService,
    req: CheckInRequest,
    now: NaiveDateTime,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let tag = req.tag.trim();
    if tag.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "RFID tag is required"));
    }

    let storage = service.get_storage(request)?;

    // 1. 卡片与学生
    let card = match storage.get_rfid_card_by_tag(tag).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            warn!("Check-in with unknown RFID tag {}", tag);
            return Ok(not_found(ErrorCode::RfidCardNotFound, "RFID card not found"));
        }
        Err(e) => return Ok(query_failed(e, "Failed to look up RFID card")),
    };
    if !card.is_active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::RfidCardInactive,
            "RFID card is deactivated",
        )));
    }
    let student = match storage.get_student_by_id(card.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve student")),
    };

    // 2. 定位当前节次的课
    let config = &AppConfig::get().schedule;
    let today = format_date(now.date());
    let slot = current_period(now.time(), config);

    let mut schedule = None;
    if let (Some(class_id), Some((period, _))) = (student.class_id, slot) {
        schedule = match storage.find_class_schedule_at(class_id, &today, period).await {
            Ok(found) => found,
            Err(e) => return Ok(query_failed(e, "Failed to look up schedule")),
        };
    }

    let (status, period) = match (&schedule, slot) {
        (Some(lesson), Some((_, start))) => (
            check_in_status(now.time(), start, config.late_grace_minutes),
            Some(lesson.period),
        ),
        _ => (AttendanceStatus::Present, None),
    };
    let schedule_id = schedule.as_ref().map(|s| s.id);

    // 3. 同一节课（或当天）只记一次
    match storage
        .find_attendance(student.id, &today, schedule_id)
        .await
    {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AttendanceAlreadyRecorded,
                "Attendance already recorded",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(query_failed(e, "Failed to check attendance")),
    }

    let record = NewAttendance {
        student_id: student.id,
        class_id: student.class_id,
        schedule_id,
        attendance_date: today,
        status,
        method: AttendanceMethod::Rfid,
        check_in_at: Some(Utc::now()),
        note: None,
        recorded_by: None,
    };

    match storage.create_attendance(record).await {
        Ok(log) => {
            info!(
                "RFID check-in: student {} {} (period {:?})",
                student.student_code, log.status, period
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CheckInResponse {
                    log,
                    student_name: student.full_name,
                    period,
                },
                "Check-in recorded",
            )))
        }
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::AttendanceAlreadyRecorded,
            "Attendance already recorded",
            "Check-in failed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScheduleConfig {
        ScheduleConfig {
            days_per_week: 5,
            periods_per_day: 3,
            period_start_times: vec![
                "08:00".to_string(),
                "09:00".to_string(),
                "10:00".to_string(),
            ],
            period_minutes: 45,
            late_grace_minutes: 10,
        }
    }

    fn at(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    #[test]
    fn test_current_period_selection() {
        let config = config();
        // 上课前刷卡归到第一节
        assert_eq!(current_period(at("07:15"), &config), Some((1, at("08:00"))));
        assert_eq!(current_period(at("08:30"), &config), Some((1, at("08:00"))));
        // 课间归到下一节
        assert_eq!(current_period(at("08:50"), &config), Some((2, at("09:00"))));
        assert_eq!(current_period(at("10:44"), &config), Some((3, at("10:00"))));
        // 放学后没有节次
        assert_eq!(current_period(at("10:45"), &config), None);
    }

    #[test]
    fn test_late_after_grace() {
        assert_eq!(
            check_in_status(at("07:55"), at("08:00"), 10),
            AttendanceStatus::Present
        );
        assert_eq!(
            check_in_status(at("08:10"), at("08:00"), 10),
            AttendanceStatus::Present
        );
        assert_eq!(
            check_in_status(at("08:11"), at("08:00"), 10),
            AttendanceStatus::Late
        );
    }
}
