use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::batches::requests::{BatchQueryParams, CreateBatchRequest, UpdateBatchRequest};
use crate::models::users::entities::UserRole;
use crate::services::BatchService;
use crate::utils::SafeIDI64;

// 懒加载的全局 BatchService 实例
static BATCH_SERVICE: Lazy<BatchService> = Lazy::new(BatchService::new_lazy);

pub async fn list_batches(
    req: HttpRequest,
    query: web::Query<BatchQueryParams>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.list_batches(query.into_inner(), &req).await
}

pub async fn create_batch(
    req: HttpRequest,
    body: web::Json<CreateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.create_batch(body.into_inner(), &req).await
}

pub async fn get_batch(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.get_batch(path.0, &req).await
}

pub async fn update_batch(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE
        .update_batch(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_batch(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.delete_batch(path.0, &req).await
}

// 届次：所有登录用户可查看，管理员维护
pub fn configure_batches_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/batches")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_batches))
                    .route(
                        web::post()
                            .to(create_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_batch))
                    .route(
                        web::put()
                            .to(update_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_batch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
