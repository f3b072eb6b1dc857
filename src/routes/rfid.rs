use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::rfid::requests::{AssignRfidRequest, RfidQueryParams};
use crate::models::users::entities::UserRole;
use crate::services::RfidService;
use crate::utils::SafeIDI64;

// 懒加载的全局 RfidService 实例
static RFID_SERVICE: Lazy<RfidService> = Lazy::new(RfidService::new_lazy);

pub async fn list_cards(
    req: HttpRequest,
    query: web::Query<RfidQueryParams>,
) -> ActixResult<HttpResponse> {
    RFID_SERVICE.list_cards(query.into_inner(), &req).await
}

pub async fn assign_card(
    req: HttpRequest,
    body: web::Json<AssignRfidRequest>,
) -> ActixResult<HttpResponse> {
    RFID_SERVICE.assign_card(body.into_inner(), &req).await
}

pub async fn get_card(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    RFID_SERVICE.get_card(path.0, &req).await
}

pub async fn deactivate_card(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    RFID_SERVICE.deactivate_card(path.0, &req).await
}

pub async fn delete_card(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    RFID_SERVICE.delete_card(path.0, &req).await
}

// 卡片管理仅限管理员
pub fn configure_rfid_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rfid-cards")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_cards))
                    .route(web::post().to(assign_card)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_card))
                    .route(web::delete().to(delete_card)),
            )
            .route("/{id}/deactivate", web::post().to(deactivate_card)),
    );
}
