use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::parents::requests::{
    CreateParentRequest, LinkStudentRequest, ParentQueryParams, UpdateParentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ParentService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 ParentService 实例
static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);

// 家长本人也可查看自己的档案
static PARENT_READERS: &[&UserRole] = &[&UserRole::Admin, &UserRole::Teacher, &UserRole::Parent];

pub async fn list_parents(
    req: HttpRequest,
    query: web::Query<ParentQueryParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_parents(query.into_inner(), &req).await
}

pub async fn create_parent(
    req: HttpRequest,
    body: web::Json<CreateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.create_parent(body.into_inner(), &req).await
}

pub async fn get_parent(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.get_parent(path.0, &req).await
}

pub async fn update_parent(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .update_parent(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_parent(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.delete_parent(path.0, &req).await
}

pub async fn link_student(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<LinkStudentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .link_student(path.0, body.into_inner(), &req)
        .await
}

pub async fn unlink_student(
    req: HttpRequest,
    parent_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .unlink_student(parent_id.0, student_id.0, &req)
        .await
}

// 配置路由
pub fn configure_parents_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parents")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_parents)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_parent)
                            .wrap(middlewares::RequireRole::new_any(PARENT_READERS)),
                    )
                    .route(
                        web::put()
                            .to(update_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 家长与学生的关联
            .service(
                web::scope("/{id}/students")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::post().to(link_student))
                    .route("/{student_id}", web::delete().to(unlink_student)),
            ),
    );
}
