use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BatchService, check_year_range};
use crate::models::{
    ApiResponse, ErrorCode,
    batches::{
        requests::{BatchQueryParams, UpdateBatchRequest},
        responses::BatchDetailResponse,
    },
};
use crate::services::{bad_request, delete_failed, not_found, query_failed, write_failed};

pub async fn list_batches(
    service: &BatchService,
    query: BatchQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_batches_with_pagination(query.into()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Batch list retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve batch list")),
    }
}

pub async fn get_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let batch = match storage.get_batch_by_id(batch_id).await {
        Ok(Some(batch)) => batch,
        Ok(None) => return Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => return Ok(query_failed(e, "Failed to retrieve batch")),
    };

    match storage.list_classes_by_batch(batch_id).await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BatchDetailResponse { batch, classes },
            "Batch retrieved successfully",
        ))),
        Err(e) => Ok(query_failed(e, "Failed to retrieve batch classes")),
    }
}

pub async fn update_batch(
    service: &BatchService,
    batch_id: i64,
    update: UpdateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 年份可以只改一个，需要和已有值合并后校验
    if update.start_year.is_some() || update.end_year.is_some() {
        let current = match storage.get_batch_by_id(batch_id).await {
            Ok(Some(batch)) => batch,
            Ok(None) => return Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
            Err(e) => return Ok(query_failed(e, "Failed to retrieve batch")),
        };
        let start_year = update.start_year.unwrap_or(current.start_year);
        let end_year = update.end_year.unwrap_or(current.end_year);
        if let Err(msg) = check_year_range(start_year, end_year) {
            return Ok(bad_request(ErrorCode::BatchInvalid, msg));
        }
    }

    match storage.update_batch(batch_id, update).await {
        Ok(Some(batch)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            batch,
            "Batch updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => Ok(write_failed(
            e,
            ErrorCode::BatchInvalid,
            "Batch already exists",
            "Batch update failed",
        )),
    }
}

pub async fn delete_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_batch(batch_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Batch deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found")),
        Err(e) => Ok(delete_failed(e, "Batch deletion failed")),
    }
}
