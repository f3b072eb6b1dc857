use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::schedules::requests::{
    CreateScheduleRequest, GenerateScheduleRequest, ScheduleQueryParams, UpdateScheduleRequest,
    WeeklyScheduleParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ScheduleService 实例
static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_schedules(
    req: HttpRequest,
    query: web::Query<ScheduleQueryParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .list_schedules(query.into_inner(), &req)
        .await
}

pub async fn create_schedule(
    req: HttpRequest,
    body: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .create_schedule(body.into_inner(), &req)
        .await
}

pub async fn get_schedule(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_schedule(path.0, &req).await
}

pub async fn update_schedule(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_schedule(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_schedule(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_schedule(path.0, &req).await
}

pub async fn weekly_schedule(
    req: HttpRequest,
    query: web::Query<WeeklyScheduleParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .weekly_schedule(query.into_inner(), &req)
        .await
}

pub async fn generate_schedules(
    req: HttpRequest,
    body: web::Json<GenerateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .generate_schedules(body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_schedules_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedules")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_schedules))
                    .route(
                        web::post()
                            .to(create_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 周课表：学生与教师可省略 class_id / teacher_id
            .service(web::resource("/weekly").route(web::get().to(weekly_schedule)))
            .service(
                web::resource("/generate")
                    .wrap(RateLimit::schedule_generation())
                    .route(
                        web::post()
                            .to(generate_schedules)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_schedule))
                    .route(
                        web::put()
                            .to(update_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
