use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::attendance::requests::{
    AttendanceQueryParams, AttendanceSummaryParams, BulkAttendanceRequest, CheckInRequest,
    RecordAttendanceRequest, UpdateAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(query.into_inner(), &req)
        .await
}

pub async fn record_attendance(
    req: HttpRequest,
    body: web::Json<RecordAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .record_attendance(body.into_inner(), &req)
        .await
}

pub async fn bulk_record(
    req: HttpRequest,
    body: web::Json<BulkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.bulk_record(body.into_inner(), &req).await
}

pub async fn check_in(
    req: HttpRequest,
    body: web::Json<CheckInRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.check_in(body.into_inner(), &req).await
}

pub async fn summary(
    req: HttpRequest,
    query: web::Query<AttendanceSummaryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.summary(query.into_inner(), &req).await
}

pub async fn update_attendance(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_attendance(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(path.0, &req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 学生只看自己，家长只看子女，业务层限定范围
                    .route(web::get().to(list_attendance))
                    .route(
                        web::post()
                            .to(record_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(web::resource("/summary").route(web::get().to(summary)))
            .service(
                web::resource("/bulk")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(bulk_record)),
            )
            // 读卡器以教职工账号登录
            .service(
                web::resource("/check-in")
                    .wrap(RateLimit::check_in())
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(check_in)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::put().to(update_attendance))
                    .route(web::delete().to(delete_attendance)),
            ),
    );
}
