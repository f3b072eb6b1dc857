pub mod create;
pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, class_data, request).await
    }

    // 教师只能看到自己担任班主任的班级
    pub async fn list_classes(
        &self,
        query: ClassQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, query, request).await
    }

    pub async fn get_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_class(self, class_id, request).await
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        update_data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_class(self, class_id, update_data, request).await
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_class(self, class_id, request).await
    }
}

/// 年级取值范围
pub(crate) fn check_grade(grade: i32) -> Result<(), &'static str> {
    if !(1..=12).contains(&grade) {
        return Err("Grade must be between 1 and 12");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_grade;

    #[test]
    fn test_grade_bounds() {
        assert!(check_grade(1).is_ok());
        assert!(check_grade(12).is_ok());
        assert!(check_grade(0).is_err());
        assert!(check_grade(13).is_err());
    }
}
