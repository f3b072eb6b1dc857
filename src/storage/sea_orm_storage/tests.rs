use super::SeaOrmStorage;
use crate::models::{
    attendance::entities::{AttendanceMethod, AttendanceStatus, NewAttendance},
    batches::requests::CreateBatchRequest,
    classes::requests::CreateClassRequest,
    classrooms::requests::CreateClassroomRequest,
    curricula::{
        entities::CurriculumSubject,
        requests::{CreateCurriculumRequest, UpdateCurriculumRequest},
    },
    parents::requests::CreateParentRequest,
    schedules::entities::{NewScheduleRow, SlotConflict},
    semesters::requests::{CreateSemesterRequest, UpdateSemesterRequest},
    students::requests::CreateStudentRequest,
    subjects::requests::CreateSubjectRequest,
    teachers::requests::CreateTeacherRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::errors::SchoolSysError;
use crate::storage::{SlotQuery, Storage};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::in_memory()
        .await
        .expect("in-memory database should open")
}

async fn semester(storage: &SeaOrmStorage, name: &str, is_current: bool) -> i64 {
    storage
        .create_semester(CreateSemesterRequest {
            name: name.to_string(),
            academic_year: "2026-2027".to_string(),
            start_date: "2026-09-07".to_string(),
            end_date: "2027-01-15".to_string(),
            is_current,
        })
        .await
        .unwrap()
        .id
}

async fn class(storage: &SeaOrmStorage, name: &str) -> i64 {
    storage
        .create_class(CreateClassRequest {
            class_name: name.to_string(),
            grade: 10,
            batch_id: None,
            homeroom_teacher_id: None,
            description: None,
        })
        .await
        .unwrap()
        .id
}

async fn subject(storage: &SeaOrmStorage, code: &str) -> i64 {
    storage
        .create_subject(CreateSubjectRequest {
            subject_code: code.to_string(),
            name: code.to_lowercase(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "hashed".to_string(),
            role,
            display_name: None,
            avatar_url: None,
        })
        .await
        .unwrap()
        .id
}

async fn student(storage: &SeaOrmStorage, code: &str, class_id: i64, user_id: Option<i64>) -> i64 {
    storage
        .create_student(CreateStudentRequest {
            student_code: code.to_string(),
            full_name: format!("Student {code}"),
            gender: None,
            date_of_birth: None,
            email: None,
            phone: None,
            address: None,
            class_id: Some(class_id),
            batch_id: None,
            user_id,
            enrolled_at: None,
        })
        .await
        .unwrap()
        .id
}

fn lesson(semester_id: i64, class_id: i64, date: &str, period: i32) -> NewScheduleRow {
    NewScheduleRow {
        semester_id,
        class_id,
        subject_id: None,
        teacher_id: None,
        classroom_id: None,
        schedule_date: date.to_string(),
        weekday: 1,
        period,
        is_free_time: false,
        note: None,
    }
}

#[tokio::test]
async fn test_batch_upsert_returns_existing_row() {
    let storage = storage().await;
    let req = || CreateBatchRequest {
        batch_code: None,
        name: None,
        start_year: 2024,
        end_year: 2027,
        description: None,
    };

    let (first, created) = storage
        .create_batch_if_not_exists("2024-2027".to_string(), req())
        .await
        .unwrap();
    let (second, created_again) = storage
        .create_batch_if_not_exists("2024-2027".to_string(), req())
        .await
        .unwrap();

    assert!(created);
    assert!(!created_again);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_only_one_semester_is_current() {
    let storage = storage().await;
    let autumn = semester(&storage, "Autumn", true).await;
    let spring = semester(&storage, "Spring", true).await;

    let autumn_now = storage.get_semester_by_id(autumn).await.unwrap().unwrap();
    assert!(!autumn_now.is_current);

    storage
        .update_semester(
            autumn,
            UpdateSemesterRequest {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let spring_now = storage.get_semester_by_id(spring).await.unwrap().unwrap();
    assert!(!spring_now.is_current);
}

#[tokio::test]
async fn test_curriculum_update_replaces_subject_lines() {
    let storage = storage().await;
    let math = subject(&storage, "MATH").await;
    let physics = subject(&storage, "PHYS").await;

    let curriculum = storage
        .create_curriculum(CreateCurriculumRequest {
            name: "Grade 10".to_string(),
            batch_id: None,
            grade: 10,
            description: None,
            subjects: vec![
                CurriculumSubject {
                    subject_id: math,
                    sessions_per_week: 5,
                },
                CurriculumSubject {
                    subject_id: physics,
                    sessions_per_week: 3,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(curriculum.weekly_sessions(), 8);

    let updated = storage
        .update_curriculum(
            curriculum.id,
            UpdateCurriculumRequest {
                subjects: Some(vec![CurriculumSubject {
                    subject_id: physics,
                    sessions_per_week: 2,
                }]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.subjects.len(), 1);
    assert_eq!(updated.subjects[0].subject_id, physics);
    assert_eq!(updated.weekly_sessions(), 2);
}

#[tokio::test]
async fn test_slot_conflicts_are_reported_per_dimension() {
    let storage = storage().await;
    let semester_id = semester(&storage, "Autumn", true).await;
    let class_a = class(&storage, "10A").await;
    let class_b = class(&storage, "10B").await;
    let math = subject(&storage, "MATH").await;
    let teacher = storage
        .create_teacher(CreateTeacherRequest {
            teacher_code: "T001".to_string(),
            full_name: "Ada".to_string(),
            email: None,
            phone: None,
            user_id: None,
            subject_ids: vec![math],
        })
        .await
        .unwrap();
    let room = storage
        .create_classroom(CreateClassroomRequest {
            name: "R101".to_string(),
            building: None,
            capacity: 40,
        })
        .await
        .unwrap();

    let mut row = lesson(semester_id, class_a, "2026-09-07", 1);
    row.subject_id = Some(math);
    row.teacher_id = Some(teacher.teacher.id);
    row.classroom_id = Some(room.id);
    let booked = storage.create_schedule(row).await.unwrap();

    let same_class = SlotQuery {
        schedule_date: "2026-09-07".to_string(),
        period: 1,
        class_id: Some(class_a),
        ..Default::default()
    };
    assert_eq!(
        storage.find_slot_conflict(same_class).await.unwrap(),
        Some(SlotConflict::Class)
    );

    let same_teacher = SlotQuery {
        schedule_date: "2026-09-07".to_string(),
        period: 1,
        class_id: Some(class_b),
        teacher_id: Some(teacher.teacher.id),
        ..Default::default()
    };
    assert_eq!(
        storage.find_slot_conflict(same_teacher).await.unwrap(),
        Some(SlotConflict::Teacher)
    );

    let same_room = SlotQuery {
        schedule_date: "2026-09-07".to_string(),
        period: 1,
        class_id: Some(class_b),
        classroom_id: Some(room.id),
        ..Default::default()
    };
    assert_eq!(
        storage.find_slot_conflict(same_room).await.unwrap(),
        Some(SlotConflict::Classroom)
    );

    let itself = SlotQuery {
        schedule_date: "2026-09-07".to_string(),
        period: 1,
        class_id: Some(class_a),
        teacher_id: Some(teacher.teacher.id),
        classroom_id: Some(room.id),
        exclude_id: Some(booked.id),
    };
    assert_eq!(storage.find_slot_conflict(itself).await.unwrap(), None);

    let next_period = SlotQuery {
        schedule_date: "2026-09-07".to_string(),
        period: 2,
        class_id: Some(class_a),
        teacher_id: Some(teacher.teacher.id),
        ..Default::default()
    };
    assert_eq!(storage.find_slot_conflict(next_period).await.unwrap(), None);
}

#[tokio::test]
async fn test_generated_schedules_replace_existing_rows() {
    let storage = storage().await;
    let semester_id = semester(&storage, "Autumn", true).await;
    let class_a = class(&storage, "10A").await;
    let class_b = class(&storage, "10B").await;

    storage
        .create_schedule(lesson(semester_id, class_b, "2026-09-07", 1))
        .await
        .unwrap();

    let first: Vec<_> = (1..=3)
        .map(|p| lesson(semester_id, class_a, "2026-09-07", p))
        .collect();
    let written = storage
        .write_generated_schedules(semester_id, &[class_a], first, false)
        .await
        .unwrap();
    assert_eq!(written, 3);

    let second = vec![lesson(semester_id, class_a, "2026-09-08", 1)];
    storage
        .write_generated_schedules(semester_id, &[class_a], second, true)
        .await
        .unwrap();

    assert_eq!(
        storage
            .count_schedules_for_classes(semester_id, &[class_a])
            .await
            .unwrap(),
        1
    );
    // 其他班级不受影响
    let others = storage
        .list_semester_bookings_excluding(semester_id, &[class_a])
        .await
        .unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].class_id, class_b);
}

#[tokio::test]
async fn test_attendance_batch_updates_existing_records() {
    let storage = storage().await;
    let class_id = class(&storage, "10A").await;
    let alice = student(&storage, "S001", class_id, None).await;
    let bob = student(&storage, "S002", class_id, None).await;

    let record = |student_id, status| NewAttendance {
        student_id,
        class_id: Some(class_id),
        schedule_id: None,
        attendance_date: "2026-09-07".to_string(),
        status,
        method: AttendanceMethod::Manual,
        check_in_at: None,
        note: None,
        recorded_by: None,
    };

    let (created, updated) = storage
        .upsert_attendance_batch(vec![
            record(alice, AttendanceStatus::Present),
            record(bob, AttendanceStatus::Absent),
        ])
        .await
        .unwrap();
    assert_eq!((created, updated), (2, 0));

    let (created, updated) = storage
        .upsert_attendance_batch(vec![record(bob, AttendanceStatus::Excused)])
        .await
        .unwrap();
    assert_eq!((created, updated), (0, 1));

    let counts = storage
        .count_attendance_by_status(Some(vec![alice, bob]), None, None)
        .await
        .unwrap();
    assert_eq!(counts.present, 1);
    assert_eq!(counts.absent, 0);
    assert_eq!(counts.excused, 1);
    assert_eq!(counts.total(), 2);
}

#[tokio::test]
async fn test_class_recipients_include_linked_parents() {
    let storage = storage().await;
    let class_id = class(&storage, "10A").await;
    let student_user = user(&storage, "alice", UserRole::Student).await;
    let parent_user = user(&storage, "alice_mum", UserRole::Parent).await;
    let alice = student(&storage, "S001", class_id, Some(student_user)).await;
    student(&storage, "S002", class_id, None).await;

    let parent = storage
        .create_parent(CreateParentRequest {
            full_name: "Alice's mum".to_string(),
            email: None,
            phone: None,
            address: None,
            user_id: Some(parent_user),
        })
        .await
        .unwrap();

    assert!(
        storage
            .link_parent_student(parent.id, alice, "mother")
            .await
            .unwrap()
    );
    assert!(
        !storage
            .link_parent_student(parent.id, alice, "mother")
            .await
            .unwrap()
    );

    let students_only = storage
        .list_class_recipient_user_ids(class_id, false)
        .await
        .unwrap();
    assert_eq!(students_only, vec![student_user]);

    let mut with_parents = storage
        .list_class_recipient_user_ids(class_id, true)
        .await
        .unwrap();
    with_parents.sort();
    assert_eq!(with_parents, vec![student_user, parent_user]);
}

fn attendance_at(student_id: i64, class_id: i64, schedule_id: Option<i64>) -> NewAttendance {
    NewAttendance {
        student_id,
        class_id: Some(class_id),
        schedule_id,
        attendance_date: "2026-09-07".to_string(),
        status: AttendanceStatus::Present,
        method: AttendanceMethod::Manual,
        check_in_at: None,
        note: None,
        recorded_by: None,
    }
}

#[tokio::test]
async fn test_attendance_is_unique_per_lesson_and_per_day() {
    let storage = storage().await;
    let semester_id = semester(&storage, "Autumn", true).await;
    let class_id = class(&storage, "10A").await;
    let alice = student(&storage, "S001", class_id, None).await;
    let first = storage
        .create_schedule(lesson(semester_id, class_id, "2026-09-07", 1))
        .await
        .unwrap();

    storage
        .create_attendance(attendance_at(alice, class_id, Some(first.id)))
        .await
        .unwrap();
    // 节次考勤与全天考勤互不冲突
    storage
        .create_attendance(attendance_at(alice, class_id, None))
        .await
        .unwrap();

    let same_lesson = storage
        .create_attendance(attendance_at(alice, class_id, Some(first.id)))
        .await
        .unwrap_err();
    assert!(same_lesson.is_unique_violation());

    let same_day = storage
        .create_attendance(attendance_at(alice, class_id, None))
        .await
        .unwrap_err();
    assert!(same_day.is_unique_violation());
}

#[tokio::test]
async fn test_timetable_with_attendance_is_not_replaced() {
    let storage = storage().await;
    let semester_id = semester(&storage, "Autumn", true).await;
    let class_id = class(&storage, "10A").await;
    let alice = student(&storage, "S001", class_id, None).await;

    let rows: Vec<_> = (1..=2)
        .map(|p| lesson(semester_id, class_id, "2026-09-07", p))
        .collect();
    storage
        .write_generated_schedules(semester_id, &[class_id], rows, false)
        .await
        .unwrap();

    for period in 1..=2 {
        let booked = storage
            .find_class_schedule_at(class_id, "2026-09-07", period)
            .await
            .unwrap()
            .unwrap();
        storage
            .create_attendance(attendance_at(alice, class_id, Some(booked.id)))
            .await
            .unwrap();
    }

    let replacement = vec![lesson(semester_id, class_id, "2026-09-08", 1)];
    let err = storage
        .write_generated_schedules(semester_id, &[class_id], replacement, true)
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolSysError::Conflict(_)));

    // 旧课表和节次考勤保持不变
    assert_eq!(
        storage
            .count_schedules_for_classes(semester_id, &[class_id])
            .await
            .unwrap(),
        2
    );
    for period in 1..=2 {
        let booked = storage
            .find_class_schedule_at(class_id, "2026-09-07", period)
            .await
            .unwrap()
            .unwrap();
        assert!(
            storage
                .find_attendance(alice, "2026-09-07", Some(booked.id))
                .await
                .unwrap()
                .is_some()
        );
    }

    let booked = storage
        .find_class_schedule_at(class_id, "2026-09-07", 1)
        .await
        .unwrap()
        .unwrap();
    let err = storage.delete_schedule(booked.id).await.unwrap_err();
    assert!(err.is_foreign_key_violation());
}
