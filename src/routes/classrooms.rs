use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classrooms::requests::{
    ClassroomQueryParams, CreateClassroomRequest, UpdateClassroomRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassroomService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ClassroomService 实例
static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);

pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<ClassroomQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.list_classrooms(query.into_inner(), &req).await
}

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.create_classroom(body.into_inner(), &req).await
}

pub async fn get_classroom(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.get_classroom(path.0, &req).await
}

pub async fn update_classroom(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .update_classroom(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_classroom(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.delete_classroom(path.0, &req).await
}

// 教室：教职工可查看，管理员维护
pub fn configure_classrooms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classrooms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_classrooms)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
