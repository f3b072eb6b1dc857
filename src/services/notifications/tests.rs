use super::*;
use crate::models::{
    classes::requests::CreateClassRequest,
    common::PaginationQuery,
    notifications::entities::{NotificationTarget, NotificationType},
    parents::requests::CreateParentRequest,
    students::requests::CreateStudentRequest,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::CreateUserRequest,
    },
};
use crate::storage::sea_orm_storage::SeaOrmStorage;
use actix_web::{HttpMessage, body::to_bytes, http::StatusCode, test::TestRequest};

async fn account(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
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
}

fn request_as(user: &User) -> actix_web::HttpRequest {
    let request = TestRequest::default().to_http_request();
    request.extensions_mut().insert(User {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        password_hash: String::new(),
        role: user.role,
        status: UserStatus::Active,
        display_name: None,
        avatar_url: None,
        last_login: None,
        created_at: user.created_at,
        updated_at: user.updated_at,
    });
    request
}

async fn json(resp: HttpResponse) -> serde_json::Value {
    let body = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn announcement(target: NotificationTarget) -> CreateNotificationRequest {
    CreateNotificationRequest {
        notification_type: NotificationType::Announcement,
        title: "Sports day".to_string(),
        content: Some("Friday afternoon".to_string()),
        reference_type: None,
        reference_id: None,
        target,
    }
}

#[actix_web::test]
async fn test_class_announcement_reaches_students_and_parents() {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open"),
    );
    let teacher = account(&storage, "teacher1", UserRole::Teacher).await;
    let kid = account(&storage, "alice", UserRole::Student).await;
    let mum = account(&storage, "alice_mum", UserRole::Parent).await;

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
    let student = storage
        .create_student(CreateStudentRequest {
            student_code: "S001".to_string(),
            full_name: "Alice".to_string(),
            gender: None,
            date_of_birth: None,
            email: None,
            phone: None,
            address: None,
            class_id: Some(class.id),
            batch_id: None,
            user_id: Some(kid.id),
            enrolled_at: None,
        })
        .await
        .unwrap();
    let parent = storage
        .create_parent(CreateParentRequest {
            full_name: "Alice's mum".to_string(),
            email: None,
            phone: None,
            address: None,
            user_id: Some(mum.id),
        })
        .await
        .unwrap();
    storage
        .link_parent_student(parent.id, student.id, "mother")
        .await
        .unwrap();

    let service = NotificationService::with_storage(storage);

    let sent = service
        .create_notification(
            announcement(NotificationTarget::Class {
                class_id: class.id,
                include_parents: true,
            }),
            &request_as(&teacher),
        )
        .await
        .unwrap();
    assert_eq!(sent.status(), StatusCode::CREATED);
    assert_eq!(json(sent).await["data"]["recipients"], 2);

    // 家长收到且未读
    let mum_request = request_as(&mum);
    let unread = service.get_unread_count(&mum_request).await.unwrap();
    assert_eq!(json(unread).await["data"]["unread_count"], 1);

    let inbox = service
        .list_notifications(
            NotificationQueryParams {
                pagination: PaginationQuery { page: 1, size: 20 },
                unread_only: false,
            },
            &mum_request,
        )
        .await
        .unwrap();
    let body = json(inbox).await;
    let id = body["data"]["items"][0]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["items"][0]["created_by"], teacher.id);

    // 别人不能操作这条通知
    let stolen = service.mark_as_read(id, &request_as(&kid)).await.unwrap();
    assert_eq!(stolen.status(), StatusCode::NOT_FOUND);

    let read = service.mark_as_read(id, &mum_request).await.unwrap();
    assert_eq!(read.status(), StatusCode::OK);
    let unread = service.get_unread_count(&mum_request).await.unwrap();
    assert_eq!(json(unread).await["data"]["unread_count"], 0);

    let deleted = service.delete_notification(id, &mum_request).await.unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_empty_audience_is_rejected() {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory database should open"),
    );
    let admin = account(&storage, "admin1", UserRole::Admin).await;
    let service = NotificationService::with_storage(storage);
    let request = request_as(&admin);

    let nobody = service
        .create_notification(
            announcement(NotificationTarget::Role {
                role: UserRole::Parent,
            }),
            &request,
        )
        .await
        .unwrap();
    assert_eq!(nobody.status(), StatusCode::BAD_REQUEST);

    let mut untitled = announcement(NotificationTarget::Users {
        user_ids: vec![admin.id],
    });
    untitled.title = "   ".to_string();
    let resp = service.create_notification(untitled, &request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let missing_class = service
        .create_notification(
            announcement(NotificationTarget::Class {
                class_id: 42,
                include_parents: false,
            }),
            &request,
        )
        .await
        .unwrap();
    assert_eq!(missing_class.status(), StatusCode::NOT_FOUND);

    let mark_all = service.mark_all_as_read(&request).await.unwrap();
    assert_eq!(json(mark_all).await["data"]["marked_count"], 0);
}
