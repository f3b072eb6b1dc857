use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::warn;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, AppStartTime,
    system::responses::{HealthResponse, SystemInfoResponse},
};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 健康检查，数据库不可用时返回 503
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = super::storage_from_request(request)?;
        let database = match storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Health check: database unreachable: {}", e);
                false
            }
        };

        let response = HealthResponse {
            status: if database { "ok" } else { "degraded" }.to_string(),
            database,
            timestamp: chrono::Utc::now(),
        };

        if database {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
        } else {
            Ok(HttpResponse::ServiceUnavailable()
                .json(ApiResponse::success(response, "Service is degraded")))
        }
    }

    pub async fn info(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = self.get_config();
        let storage = super::storage_from_request(request)?;
        let cache = super::cache_from_request(request)?;

        let started_at = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|data| data.start_datetime)
            .unwrap_or_else(chrono::Utc::now);
        let uptime_seconds = chrono::Utc::now()
            .signed_duration_since(started_at)
            .num_seconds();

        let response = SystemInfoResponse {
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            started_at,
            uptime_seconds,
            cache_backend: cache.backend_name().to_string(),
            database_backend: storage.backend_name().to_string(),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "System info retrieved successfully",
        )))
    }
}
