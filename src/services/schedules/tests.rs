use super::*;
use crate::config::AppConfig;
use crate::models::{
    ErrorCode,
    classes::requests::CreateClassRequest,
    classrooms::requests::CreateClassroomRequest,
    curricula::{entities::CurriculumSubject, requests::CreateCurriculumRequest},
    semesters::requests::CreateSemesterRequest,
    subjects::requests::CreateSubjectRequest,
    teachers::requests::CreateTeacherRequest,
};
use crate::storage::sea_orm_storage::SeaOrmStorage;
use actix_web::{body::to_bytes, http::StatusCode, test::TestRequest};

struct Fixture {
    service: ScheduleService,
    storage: Arc<dyn Storage>,
    semester_id: i64,
    class_ids: Vec<i64>,
    subject_id: i64,
    teacher_id: i64,
    classroom_id: i64,
}

async fn fixture() -> Fixture {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open"),
    );

    // 一周：2026-09-07（周一）至 2026-09-13
    let semester = storage
        .create_semester(CreateSemesterRequest {
            name: "Autumn".to_string(),
            academic_year: "2026-2027".to_string(),
            start_date: "2026-09-07".to_string(),
            end_date: "2026-09-13".to_string(),
            is_current: true,
        })
        .await
        .unwrap();

    let mut class_ids = Vec::new();
    for name in ["10A", "10B"] {
        let class = storage
            .create_class(CreateClassRequest {
                class_name: name.to_string(),
                grade: 10,
                batch_id: None,
                homeroom_teacher_id: None,
                description: None,
            })
            .await
            .unwrap();
        class_ids.push(class.id);
    }

    let subject = storage
        .create_subject(CreateSubjectRequest {
            subject_code: "MATH".to_string(),
            name: "Mathematics".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let teacher = storage
        .create_teacher(CreateTeacherRequest {
            teacher_code: "T001".to_string(),
            full_name: "Ada".to_string(),
            email: None,
            phone: None,
            user_id: None,
            subject_ids: vec![subject.id],
        })
        .await
        .unwrap();
    let classroom = storage
        .create_classroom(CreateClassroomRequest {
            name: "R101".to_string(),
            building: None,
            capacity: 40,
        })
        .await
        .unwrap();
    storage
        .create_curriculum(CreateCurriculumRequest {
            name: "Grade 10".to_string(),
            batch_id: None,
            grade: 10,
            description: None,
            subjects: vec![CurriculumSubject {
                subject_id: subject.id,
                sessions_per_week: 4,
            }],
        })
        .await
        .unwrap();

    Fixture {
        service: ScheduleService::with_storage(storage.clone()),
        storage,
        semester_id: semester.id,
        class_ids,
        subject_id: subject.id,
        teacher_id: teacher.teacher.id,
        classroom_id: classroom.id,
    }
}

fn lesson(fx: &Fixture, class_index: usize, date: &str) -> CreateScheduleRequest {
    CreateScheduleRequest {
        semester_id: fx.semester_id,
        class_id: fx.class_ids[class_index],
        subject_id: Some(fx.subject_id),
        teacher_id: Some(fx.teacher_id),
        classroom_id: Some(fx.classroom_id),
        schedule_date: date.to_string(),
        period: 1,
        is_free_time: false,
        note: None,
    }
}

async fn json_body(resp: HttpResponse) -> serde_json::Value {
    let body = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[actix_web::test]
async fn test_manual_booking_rejects_busy_teacher() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();

    let first = fx
        .service
        .create_schedule(lesson(&fx, 0, "2026-09-08"), &http)
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let clash = fx
        .service
        .create_schedule(lesson(&fx, 1, "2026-09-08"), &http)
        .await
        .unwrap();
    assert_eq!(clash.status(), StatusCode::CONFLICT);
    let body = json_body(clash).await;
    assert_eq!(body["code"], ErrorCode::ScheduleConflict as i32);
    assert!(body["message"].as_str().unwrap().contains("teacher"));
}

#[actix_web::test]
async fn test_manual_booking_outside_semester_is_invalid() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();

    let resp = fx
        .service
        .create_schedule(lesson(&fx, 0, "2026-10-01"), &http)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_can_keep_its_own_slot() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();

    let created = json_body(
        fx.service
            .create_schedule(lesson(&fx, 0, "2026-09-08"), &http)
            .await
            .unwrap(),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = fx
        .service
        .update_schedule(
            id,
            UpdateScheduleRequest {
                note: Some(Some("moved note".to_string())),
                ..Default::default()
            },
            &http,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_generation_writes_full_week_and_refuses_overwrite() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();
    let request = || GenerateScheduleRequest {
        semester_id: fx.semester_id,
        class_ids: None,
        seed: Some(2026),
        replace_existing: false,
    };

    let resp = fx
        .service
        .generate_schedules(request(), &http)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let schedule = &AppConfig::get().schedule;
    let grid = (schedule.days_per_week * schedule.periods_per_day) as i64;
    let report = json_body(resp).await;
    // 一位教师一间教室，两个班各 4 节，网格足够
    assert_eq!(report["data"]["placed_sessions"], 8);
    assert_eq!(report["data"]["unscheduled"].as_array().unwrap().len(), 0);
    assert_eq!(report["data"]["rows_written"], 2 * grid);
    assert_eq!(report["data"]["weeks"], 1);

    let again = fx
        .service
        .generate_schedules(request(), &http)
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let replaced = fx
        .service
        .generate_schedules(
            GenerateScheduleRequest {
                replace_existing: true,
                ..request()
            },
            &http,
        )
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::CREATED);
    assert_eq!(
        fx.storage
            .count_schedules_for_classes(fx.semester_id, &fx.class_ids)
            .await
            .unwrap() as i64,
        2 * grid
    );
}

#[actix_web::test]
async fn test_generation_guard_is_per_semester() {
    let guard = GenerationGuard::acquire(-1).expect("first acquire succeeds");
    assert!(GenerationGuard::acquire(-1).is_none());
    assert!(GenerationGuard::acquire(-2).is_some());
    drop(guard);
    assert!(GenerationGuard::acquire(-1).is_some());
}

#[actix_web::test]
async fn test_weekly_view_is_monday_anchored() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();
    fx.service
        .create_schedule(lesson(&fx, 0, "2026-09-08"), &http)
        .await
        .unwrap();

    let resp = fx
        .service
        .weekly_schedule(
            WeeklyScheduleParams {
                class_id: Some(fx.class_ids[0]),
                teacher_id: None,
                date: Some("2026-09-11".to_string()),
            },
            &http,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["week_start"], "2026-09-07");
    assert_eq!(body["data"]["week_end"], "2026-09-13");
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["entries"][0]["subject_name"], "Mathematics");
}

#[actix_web::test]
async fn test_update_can_clear_teacher_and_classroom() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();

    let created = json_body(
        fx.service
            .create_schedule(lesson(&fx, 0, "2026-09-08"), &http)
            .await
            .unwrap(),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = fx
        .service
        .update_schedule(
            id,
            UpdateScheduleRequest {
                teacher_id: Some(None),
                classroom_id: Some(None),
                ..Default::default()
            },
            &http,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = fx.storage.get_schedule_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.teacher_id, None);
    assert_eq!(stored.classroom_id, None);
    assert_eq!(stored.subject_id, Some(fx.subject_id));

    // 老师空出后可以给另一个班排同一节
    let other = fx
        .service
        .create_schedule(lesson(&fx, 1, "2026-09-08"), &http)
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_weekend_is_outside_the_grid() {
    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();
    assert_eq!(AppConfig::get().schedule.days_per_week, 5);

    // 2026-09-12 为周六
    let resp = fx
        .service
        .create_schedule(lesson(&fx, 0, "2026-09-12"), &http)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["code"], ErrorCode::ScheduleInvalid as i32);

    let created = json_body(
        fx.service
            .create_schedule(lesson(&fx, 0, "2026-09-11"), &http)
            .await
            .unwrap(),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let moved = fx
        .service
        .update_schedule(
            id,
            UpdateScheduleRequest {
                schedule_date: Some("2026-09-13".to_string()),
                ..Default::default()
            },
            &http,
        )
        .await
        .unwrap();
    assert_eq!(moved.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_update_request_distinguishes_null_from_missing() {
    let update: UpdateScheduleRequest =
        serde_json::from_str(r#"{"teacher_id": null, "note": "swap"}"#).unwrap();
    assert_eq!(update.teacher_id, Some(None));
    assert_eq!(update.classroom_id, None);
    assert_eq!(update.note, Some(Some("swap".to_string())));
}

#[actix_web::test]
async fn test_regeneration_keeps_timetable_with_attendance() {
    use crate::models::attendance::entities::{AttendanceMethod, AttendanceStatus, NewAttendance};
    use crate::models::students::requests::CreateStudentRequest;

    let fx = fixture().await;
    let http = TestRequest::default().to_http_request();
    let request = |replace_existing| GenerateScheduleRequest {
        semester_id: fx.semester_id,
        class_ids: Some(vec![fx.class_ids[0]]),
        seed: Some(7),
        replace_existing,
    };

    let resp = fx
        .service
        .generate_schedules(request(false), &http)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut booked = None;
    'days: for day in 7..=11 {
        let date = format!("2026-09-{day:02}");
        for period in 1..=AppConfig::get().schedule.periods_per_day as i32 {
            if let Some(lesson) = fx
                .storage
                .find_class_schedule_at(fx.class_ids[0], &date, period)
                .await
                .unwrap()
            {
                booked = Some(lesson);
                break 'days;
            }
        }
    }
    let booked = booked.expect("generated week contains a lesson");

    let student = fx
        .storage
        .create_student(CreateStudentRequest {
            student_code: "S001".to_string(),
            full_name: "Student S001".to_string(),
            gender: None,
            date_of_birth: None,
            email: None,
            phone: None,
            address: None,
            class_id: Some(fx.class_ids[0]),
            batch_id: None,
            user_id: None,
            enrolled_at: None,
        })
        .await
        .unwrap();
    fx.storage
        .create_attendance(NewAttendance {
            student_id: student.id,
            class_id: Some(fx.class_ids[0]),
            schedule_id: Some(booked.id),
            attendance_date: booked.schedule_date.clone(),
            status: AttendanceStatus::Present,
            method: AttendanceMethod::Manual,
            check_in_at: None,
            note: None,
            recorded_by: None,
        })
        .await
        .unwrap();

    let replaced = fx
        .service
        .generate_schedules(request(true), &http)
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::CONFLICT);
    let body = json_body(replaced).await;
    assert_eq!(body["code"], ErrorCode::ScheduleInUse as i32);

    assert!(fx.storage.get_schedule_by_id(booked.id).await.unwrap().is_some());
}
