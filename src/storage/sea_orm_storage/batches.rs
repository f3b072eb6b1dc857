//! 届次存储操作

use super::SeaOrmStorage;
use crate::entity::batches::{ActiveModel, Column, Entity as Batches};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    batches::{
        entities::Batch,
        requests::{BatchListQuery, CreateBatchRequest, UpdateBatchRequest},
        responses::BatchListResponse,
    },
    common::pagination::normalize_page,
};
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 通过编码获取届次
    pub async fn get_batch_by_code_impl(&self, batch_code: &str) -> Result<Option<Batch>> {
        let result = Batches::find()
            .filter(Column::BatchCode.eq(batch_code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询届次失败: {e}")))?;

        Ok(result.map(|m| m.into_batch()))
    }

    /// 按编码创建届次
    ///
    /// 编码已存在时返回已有记录；并发插入撞上唯一索引时重新读取已有记录。
    pub async fn create_batch_if_not_exists_impl(
        &self,
        batch_code: String,
        req: CreateBatchRequest,
    ) -> Result<(Batch, bool)> {
        if let Some(existing) = self.get_batch_by_code_impl(&batch_code).await? {
            return Ok((existing, false));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            batch_code: Set(batch_code.clone()),
            name: Set(req.name.unwrap_or_else(|| batch_code.clone())),
            start_year: Set(req.start_year),
            end_year: Set(req.end_year),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok((result.into_batch(), true)),
            Err(e) => {
                let err = SchoolSysError::database_operation(format!("创建届次失败: {e}"));
                if !err.is_unique_violation() {
                    return Err(err);
                }
                tracing::debug!("Batch {} inserted concurrently, returning existing", batch_code);
                self.get_batch_by_code_impl(&batch_code)
                    .await?
                    .map(|b| (b, false))
                    .ok_or(err)
            }
        }
    }

    pub async fn get_batch_by_id_impl(&self, id: i64) -> Result<Option<Batch>> {
        let result = Batches::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询届次失败: {e}")))?;

        Ok(result.map(|m| m.into_batch()))
    }

    pub async fn list_batches_with_pagination_impl(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Batches::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::BatchCode.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::StartYear);

        let (batches, pagination) = self.fetch_page(select, page, size, "届次").await?;

        Ok(BatchListResponse {
            items: batches.into_iter().map(|m| m.into_batch()).collect(),
            pagination,
        })
    }

    pub async fn update_batch_impl(
        &self,
        id: i64,
        update: UpdateBatchRequest,
    ) -> Result<Option<Batch>> {
        if self.get_batch_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(start_year) = update.start_year {
            model.start_year = Set(start_year);
        }
        if let Some(end_year) = update.end_year {
            model.end_year = Set(end_year);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新届次失败: {e}")))?;

        self.get_batch_by_id_impl(id).await
    }

    pub async fn delete_batch_impl(&self, id: i64) -> Result<bool> {
        let result = Batches::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除届次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
