use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashSet;
use tracing::{info, warn};

use super::planner::{self, Cell, ClassPlan, PlannerInput, TeacherOption};
use super::{GenerationGuard, ScheduleService};
use crate::config::AppConfig;
use crate::errors::SchoolSysError;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::entities::Class,
    curricula::entities::Curriculum,
    schedules::{
        requests::GenerateScheduleRequest,
        responses::{ClassGenerationSummary, GenerationReport},
    },
};
use crate::services::{not_found, query_failed, write_failed};
use crate::utils::dates::parse_date;

/// 为班级挑选教学大纲：同届次同年级优先，其次同年级的通用大纲
pub(crate) fn curriculum_for<'a>(class: &Class, curricula: &'a [Curriculum]) -> Option<&'a Curriculum> {
    curricula
        .iter()
        .find(|c| c.grade == class.grade && class.batch_id.is_some() && c.batch_id == class.batch_id)
        .or_else(|| {
            curricula
                .iter()
                .find(|c| c.grade == class.grade && c.batch_id.is_none())
        })
}

fn generation_failed(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::ScheduleGenerationFailed,
        message,
    ))
}

pub async fn generate_schedules(
    service: &ScheduleService,
    req: GenerateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(_guard) = GenerationGuard::acquire(req.semester_id) else {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ScheduleGenerationInProgress,
            "Schedule generation for this semester is already running",
        )));
    };

    let storage = service.get_storage(request)?;
    let schedule_config = &AppConfig::get().schedule;

    // 1. 学期与班级
    let semester = match storage.get_semester_by_id(req.semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => return Ok(not_found(ErrorCode::SemesterNotFound, "Semester not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve semester")),
    };
    let (start, end) = match (parse_date(&semester.start_date), parse_date(&semester.end_date)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => return Ok(generation_failed("Semester has invalid dates")),
    };

    let classes = match storage.list_classes_by_ids(req.class_ids.clone()).await {
        Ok(classes) => classes,
        Err(e) => return Ok(query_failed(e, "Failed to retrieve classes")),
    };
    if let Some(ref wanted) = req.class_ids {
        let found: HashSet<i64> = classes.iter().map(|c| c.id).collect();
        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Ok(not_found(
                ErrorCode::ClassNotFound,
                &format!("Class {missing} not found"),
            ));
        }
    }
    if classes.is_empty() {
        return Ok(not_found(ErrorCode::ClassNotFound, "No classes to schedule"));
    }
    let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();

    // 2. 已有课表
    let existing = match storage
        .count_schedules_for_classes(req.semester_id, &class_ids)
        .await
    {
        Ok(count) => count,
        Err(e) => return Ok(query_failed(e, "Failed to count existing schedules")),
    };
    if existing > 0 && !req.replace_existing {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ScheduleAlreadyExists,
            format!(
                "{existing} schedule rows already exist for the selected classes; set replace_existing to overwrite"
            ),
        )));
    }

    // 3. 排课资源
    let curricula = match storage.list_all_curricula().await {
        Ok(curricula) => curricula,
        Err(e) => return Ok(query_failed(e, "Failed to retrieve curricula")),
    };
    let teachers = match storage.list_active_teachers_with_subjects().await {
        Ok(teachers) => teachers,
        Err(e) => return Ok(query_failed(e, "Failed to retrieve teachers")),
    };
    let classrooms = match storage.list_all_classrooms().await {
        Ok(classrooms) => classrooms,
        Err(e) => return Ok(query_failed(e, "Failed to retrieve classrooms")),
    };
    let bookings = match storage
        .list_semester_bookings_excluding(req.semester_id, &class_ids)
        .await
    {
        Ok(bookings) => bookings,
        Err(e) => return Ok(query_failed(e, "Failed to retrieve existing bookings")),
    };

    let mut input = PlannerInput {
        days_per_week: schedule_config.days_per_week,
        periods_per_day: schedule_config.periods_per_day,
        teachers: teachers
            .into_iter()
            .map(|(teacher, subject_ids)| TeacherOption {
                teacher_id: teacher.id,
                subject_ids,
            })
            .collect(),
        classroom_ids: classrooms.iter().map(|c| c.id).collect(),
        ..Default::default()
    };

    // 其他班级的课占用的星期/节次在每周都视为不可用
    for booking in &bookings {
        let cell = Cell {
            weekday: booking.weekday.max(0) as u32,
            period: booking.period.max(0) as u32,
        };
        if let Some(teacher_id) = booking.teacher_id {
            input.busy_teachers.insert((teacher_id, cell));
        }
        if let Some(classroom_id) = booking.classroom_id {
            input.busy_classrooms.insert((classroom_id, cell));
        }
    }

    let mut chosen_curricula = Vec::with_capacity(classes.len());
    for class in &classes {
        let curriculum = curriculum_for(class, &curricula);
        if curriculum.is_none() {
            warn!(
                "No curriculum for class {} (grade {}), it will only get free slots",
                class.class_name, class.grade
            );
        }
        input.classes.push(ClassPlan {
            class_id: class.id,
            subjects: curriculum.map(|c| c.subjects.clone()).unwrap_or_default(),
        });
        chosen_curricula.push(curriculum.map(|c| c.id));
    }

    // 4. 排课并展开到整个学期
    let seed = req.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let plan = planner::plan_week(&input, &mut rng);
    let rows = planner::expand_over_semester(
        &plan,
        req.semester_id,
        start,
        end,
        schedule_config.days_per_week,
    );

    let rows_written = match storage
        .write_generated_schedules(req.semester_id, &class_ids, rows, req.replace_existing)
        .await
    {
        Ok(written) => written,
        Err(SchoolSysError::Conflict(msg)) => {
            warn!("Refusing to replace timetable of semester {}: {}", req.semester_id, msg);
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ScheduleInUse,
                "Existing timetable already has attendance records and cannot be replaced",
            )));
        }
        Err(e) => {
            return Ok(write_failed(
                e,
                ErrorCode::ScheduleConflict,
                "Generated timetable collides with existing bookings",
                "Schedule generation failed",
            ));
        }
    };

    let summaries = classes
        .iter()
        .zip(&plan.classes)
        .zip(chosen_curricula)
        .map(|((class, template), curriculum_id)| ClassGenerationSummary {
            class_id: class.id,
            class_name: class.class_name.clone(),
            curriculum_id,
            placed_sessions: template.sessions.len() as i32,
            free_slots: template.free_cells.len() as i32,
        })
        .collect();

    let report = GenerationReport {
        semester_id: req.semester_id,
        seed,
        classes: summaries,
        placed_sessions: plan.placed_sessions() as i32,
        free_slots: plan.free_slots() as i32,
        unscheduled: plan.unscheduled.clone(),
        weeks: planner::week_count(start, end),
        rows_written: rows_written as i64,
    };

    info!(
        "Generated semester {} schedules: {} classes, {} sessions/week placed, {} unscheduled lines, {} rows (seed {})",
        req.semester_id,
        report.classes.len(),
        report.placed_sessions,
        report.unscheduled.len(),
        report.rows_written,
        seed
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        report,
        "Schedules generated successfully",
    )))
}
