use super::*;
use crate::config::AppConfig;
use crate::models::{
    ErrorCode,
    attendance::{
        entities::AttendanceStatus,
        requests::{BulkAttendanceItem, RecordAttendanceRequest},
    },
    classes::requests::CreateClassRequest,
    schedules::entities::NewScheduleRow,
    semesters::requests::CreateSemesterRequest,
    students::requests::CreateStudentRequest,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::CreateUserRequest,
    },
};
use crate::storage::sea_orm_storage::SeaOrmStorage;
use actix_web::{HttpMessage, body::to_bytes, http::StatusCode, test::TestRequest};
use chrono::{Duration, NaiveDate, NaiveTime};

struct Fixture {
    service: AttendanceService,
    storage: Arc<dyn Storage>,
    class_id: i64,
    schedule_id: i64,
    students: Vec<i64>,
    teacher_user_id: i64,
}

// 2026-09-07（周一）第一节有课的班级，三名学生
async fn fixture() -> Fixture {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open"),
    );
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
    let class = storage
        .create_class(CreateClassRequest {
            class_name: "10A".to_string(),
            grade: 10,
            batch_id: None,
            homeroom_teacher_id: None,
            description: None,
        })
        .await
        .unwrap();

    let mut students = Vec::new();
    for code in ["S001", "S002", "S003"] {
        let student = storage
            .create_student(CreateStudentRequest {
                student_code: code.to_string(),
                full_name: format!("Student {code}"),
                gender: None,
                date_of_birth: None,
                email: None,
                phone: None,
                address: None,
                class_id: Some(class.id),
                batch_id: None,
                user_id: None,
                enrolled_at: None,
            })
            .await
            .unwrap();
        students.push(student.id);
    }

    let schedule = storage
        .create_schedule(NewScheduleRow {
            semester_id: semester.id,
            class_id: class.id,
            subject_id: None,
            teacher_id: None,
            classroom_id: None,
            schedule_date: "2026-09-07".to_string(),
            weekday: 1,
            period: 1,
            is_free_time: false,
            note: None,
        })
        .await
        .unwrap();

    let teacher = storage
        .create_user(CreateUserRequest {
            username: "teacher".to_string(),
            email: "teacher@school.test".to_string(),
            password: "hashed".to_string(),
            role: UserRole::Teacher,
            display_name: None,
            avatar_url: None,
        })
        .await
        .unwrap();

    Fixture {
        service: AttendanceService::with_storage(storage.clone()),
        storage,
        class_id: class.id,
        schedule_id: schedule.id,
        students,
        teacher_user_id: teacher.id,
    }
}

fn staff_request(user_id: i64) -> actix_web::HttpRequest {
    let now = chrono::Utc::now();
    let request = TestRequest::default().to_http_request();
    request.extensions_mut().insert(User {
        id: user_id,
        username: "teacher".to_string(),
        email: "teacher@school.test".to_string(),
        password_hash: String::new(),
        role: UserRole::Teacher,
        status: UserStatus::Active,
        display_name: None,
        avatar_url: None,
        last_login: None,
        created_at: now,
        updated_at: now,
    });
    request
}

// 第一节开始后若干分钟
fn first_period_plus(minutes: i64) -> chrono::NaiveDateTime {
    let config = &AppConfig::get().schedule;
    let start = NaiveTime::parse_from_str(&config.period_start_times[0], "%H:%M").unwrap();
    NaiveDate::from_ymd_opt(2026, 9, 7)
        .unwrap()
        .and_time(start)
        + Duration::minutes(minutes)
}

async fn json(resp: HttpResponse) -> serde_json::Value {
    let body = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[actix_web::test]
async fn test_check_in_attaches_to_current_lesson() {
    let fx = fixture().await;
    let grace = AppConfig::get().schedule.late_grace_minutes as i64;
    for (student, tag) in fx.students.iter().zip(["TAG-1", "TAG-2"]) {
        fx.storage.create_rfid_card(tag, *student).await.unwrap();
    }
    let request = TestRequest::default().to_http_request();

    let on_time = check_in::check_in(
        &fx.service,
        CheckInRequest {
            tag: "TAG-1".to_string(),
        },
        first_period_plus(0),
        &request,
    )
    .await
    .unwrap();
    assert_eq!(on_time.status(), StatusCode::CREATED);
    let body = json(on_time).await;
    assert_eq!(body["data"]["log"]["status"], "present");
    assert_eq!(body["data"]["log"]["schedule_id"], fx.schedule_id);
    assert_eq!(body["data"]["period"], 1);

    let late = check_in::check_in(
        &fx.service,
        CheckInRequest {
            tag: "TAG-2".to_string(),
        },
        first_period_plus(grace + 1),
        &request,
    )
    .await
    .unwrap();
    assert_eq!(json(late).await["data"]["log"]["status"], "late");

    // 同一节课重复刷卡
    let again = check_in::check_in(
        &fx.service,
        CheckInRequest {
            tag: "TAG-1".to_string(),
        },
        first_period_plus(5),
        &request,
    )
    .await
    .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_check_in_rejects_unknown_and_inactive_cards() {
    let fx = fixture().await;
    let card = fx.storage.create_rfid_card("TAG-9", fx.students[2]).await.unwrap();
    fx.storage.deactivate_rfid_card(card.id).await.unwrap();
    let request = TestRequest::default().to_http_request();

    let unknown = check_in::check_in(
        &fx.service,
        CheckInRequest {
            tag: "NOPE".to_string(),
        },
        first_period_plus(0),
        &request,
    )
    .await
    .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let inactive = check_in::check_in(
        &fx.service,
        CheckInRequest {
            tag: "TAG-9".to_string(),
        },
        first_period_plus(0),
        &request,
    )
    .await
    .unwrap();
    assert_eq!(inactive.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json(inactive).await["code"],
        ErrorCode::RfidCardInactive.as_i32()
    );
}

#[actix_web::test]
async fn test_manual_record_is_unique_per_lesson() {
    let fx = fixture().await;
    let request = staff_request(fx.teacher_user_id);
    let record = || RecordAttendanceRequest {
        student_id: fx.students[0],
        attendance_date: None,
        schedule_id: Some(fx.schedule_id),
        status: AttendanceStatus::Absent,
        note: None,
    };

    let first = fx.service.record_attendance(record(), &request).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = json(first).await;
    assert_eq!(body["data"]["attendance_date"], "2026-09-07");
    assert_eq!(body["data"]["class_id"], fx.class_id);
    assert_eq!(body["data"]["recorded_by"], fx.teacher_user_id);

    let second = fx.service.record_attendance(record(), &request).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_roll_call_updates_and_rejects_outsiders() {
    let fx = fixture().await;
    let request = staff_request(fx.teacher_user_id);
    let entry = |student_id, status| BulkAttendanceItem {
        student_id,
        status,
        note: None,
    };

    let first = fx
        .service
        .bulk_record(
            BulkAttendanceRequest {
                schedule_id: fx.schedule_id,
                entries: vec![
                    entry(fx.students[0], AttendanceStatus::Present),
                    entry(fx.students[1], AttendanceStatus::Absent),
                ],
            },
            &request,
        )
        .await
        .unwrap();
    let body = json(first).await;
    assert_eq!(body["data"]["created"], 2);
    assert_eq!(body["data"]["updated"], 0);

    let second = fx
        .service
        .bulk_record(
            BulkAttendanceRequest {
                schedule_id: fx.schedule_id,
                entries: vec![
                    entry(fx.students[1], AttendanceStatus::Excused),
                    entry(fx.students[2], AttendanceStatus::Present),
                ],
            },
            &request,
        )
        .await
        .unwrap();
    let body = json(second).await;
    assert_eq!(body["data"]["created"], 1);
    assert_eq!(body["data"]["updated"], 1);

    let duplicated = fx
        .service
        .bulk_record(
            BulkAttendanceRequest {
                schedule_id: fx.schedule_id,
                entries: vec![
                    entry(fx.students[0], AttendanceStatus::Present),
                    entry(fx.students[0], AttendanceStatus::Late),
                ],
            },
            &request,
        )
        .await
        .unwrap();
    assert_eq!(duplicated.status(), StatusCode::BAD_REQUEST);

    let outsider = fx
        .service
        .bulk_record(
            BulkAttendanceRequest {
                schedule_id: fx.schedule_id,
                entries: vec![entry(9_999, AttendanceStatus::Present)],
            },
            &request,
        )
        .await
        .unwrap();
    assert_eq!(outsider.status(), StatusCode::BAD_REQUEST);

    let summary = fx
        .service
        .summary(
            AttendanceSummaryParams {
                student_id: None,
                from: Some("2026-09-07".to_string()),
                to: Some("2026-09-07".to_string()),
            },
            &request,
        )
        .await
        .unwrap();
    let body = json(summary).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["excused"], 1);
    assert_eq!(body["data"]["attendance_rate_bp"], 6_666);
}
