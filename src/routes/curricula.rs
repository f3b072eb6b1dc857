use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::curricula::requests::{
    CreateCurriculumRequest, CurriculumQueryParams, UpdateCurriculumRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CurriculumService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CurriculumService 实例
static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);

pub async fn list_curricula(
    req: HttpRequest,
    query: web::Query<CurriculumQueryParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.list_curricula(query.into_inner(), &req).await
}

pub async fn create_curriculum(
    req: HttpRequest,
    body: web::Json<CreateCurriculumRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.create_curriculum(body.into_inner(), &req).await
}

pub async fn get_curriculum(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_curriculum(path.0, &req).await
}

pub async fn update_curriculum(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateCurriculumRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .update_curriculum(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_curriculum(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_curriculum(path.0, &req).await
}

// 教学大纲：教职工可查看，管理员维护
pub fn configure_curricula_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/curricula")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_curricula)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_curriculum)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_curriculum)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_curriculum)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_curriculum)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
