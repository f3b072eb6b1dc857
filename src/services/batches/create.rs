use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BatchService, check_year_range};
use crate::models::{
    ApiResponse, ErrorCode,
    batches::{entities::Batch, requests::CreateBatchRequest, responses::BatchUpsertResponse},
};
use crate::services::{bad_request, write_failed};
use crate::utils::validate::validate_code;

pub async fn create_batch(
    service: &BatchService,
    req: CreateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_year_range(req.start_year, req.end_year) {
        return Ok(bad_request(ErrorCode::BatchInvalid, msg));
    }

    let batch_code = match req.batch_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            if let Err(msg) = validate_code(code) {
                return Ok(bad_request(ErrorCode::BatchInvalid, msg));
            }
            code.to_string()
        }
        _ => Batch::default_code(req.start_year, req.end_year),
    };

    let storage = service.get_storage(request)?;

    match storage.create_batch_if_not_exists(batch_code, req).await {
        Ok((batch, true)) => {
            info!("Created batch {}", batch.batch_code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                BatchUpsertResponse { batch, is_new: true },
                "Batch created successfully",
            )))
        }
        Ok((batch, false)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BatchUpsertResponse {
                batch,
                is_new: false,
            },
            "Batch already exists",
        ))),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::BatchInvalid,
            "Batch code already exists",
            "Batch creation failed",
        )),
    }
}
