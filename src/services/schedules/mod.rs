pub mod generate;
pub mod manual;
pub mod planner;
pub mod weekly;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::models::schedules::requests::{
    CreateScheduleRequest, GenerateScheduleRequest, ScheduleQueryParams, UpdateScheduleRequest,
    WeeklyScheduleParams,
};
use crate::storage::Storage;

/// 正在排课的学期
static GENERATION_LOCKS: Lazy<DashMap<i64, ()>> = Lazy::new(DashMap::new);

/// 学期排课锁，离开作用域时释放
pub(crate) struct GenerationGuard {
    semester_id: i64,
}

impl GenerationGuard {
    /// 同一学期已有排课在进行时返回 None
    pub(crate) fn acquire(semester_id: i64) -> Option<Self> {
        match GENERATION_LOCKS.entry(semester_id) {
            dashmap::Entry::Occupied(_) => None,
            dashmap::Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self { semester_id })
            }
        }
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        GENERATION_LOCKS.remove(&self.semester_id);
    }
}

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_schedules(
        &self,
        query: ScheduleQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manual::list_schedules(self, query, request).await
    }

    pub async fn get_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manual::get_schedule(self, id, request).await
    }

    // 手动排课，占用冲突返回 409
    pub async fn create_schedule(
        &self,
        req: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manual::create_schedule(self, req, request).await
    }

    pub async fn update_schedule(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manual::update_schedule(self, id, update, request).await
    }

    pub async fn delete_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manual::delete_schedule(self, id, request).await
    }

    // 周课表
    pub async fn weekly_schedule(
        &self,
        params: WeeklyScheduleParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        weekly::weekly_schedule(self, params, request).await
    }

    // 自动排课
    pub async fn generate_schedules(
        &self,
        req: GenerateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_schedules(self, req, request).await
    }
}

#[cfg(test)]
mod tests;
