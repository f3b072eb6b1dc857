//! RFID 卡存储操作

use super::SeaOrmStorage;
use crate::entity::rfid_cards::{ActiveModel, Column, Entity as RfidCards};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    rfid::{entities::RfidCard, requests::RfidListQuery, responses::RfidListResponse},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_rfid_card_impl(&self, tag: &str, student_id: i64) -> Result<RfidCard> {
        let model = ActiveModel {
            tag: Set(tag.to_string()),
            student_id: Set(student_id),
            is_active: Set(true),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("绑定 RFID 卡失败: {e}")))?;

        Ok(result.into_rfid_card())
    }

    pub async fn get_rfid_card_by_id_impl(&self, id: i64) -> Result<Option<RfidCard>> {
        let result = RfidCards::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询 RFID 卡失败: {e}")))?;

        Ok(result.map(|m| m.into_rfid_card()))
    }

    pub async fn get_rfid_card_by_tag_impl(&self, tag: &str) -> Result<Option<RfidCard>> {
        let result = RfidCards::find()
            .filter(Column::Tag.eq(tag))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询 RFID 卡失败: {e}")))?;

        Ok(result.map(|m| m.into_rfid_card()))
    }

    pub async fn list_rfid_cards_with_pagination_impl(
        &self,
        query: RfidListQuery,
    ) -> Result<RfidListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = RfidCards::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let (models, pagination) = self
            .fetch_page(select.order_by_desc(Column::AssignedAt), page, size, "RFID 卡")
            .await?;

        Ok(RfidListResponse {
            items: models.into_iter().map(|m| m.into_rfid_card()).collect(),
            pagination,
        })
    }

    /// 停用卡片，保留记录以便追溯
    pub async fn deactivate_rfid_card_impl(&self, id: i64) -> Result<Option<RfidCard>> {
        let Some(existing) = RfidCards::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询 RFID 卡失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.is_active = Set(false);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("停用 RFID 卡失败: {e}")))?;

        Ok(Some(result.into_rfid_card()))
    }

    pub async fn delete_rfid_card_impl(&self, id: i64) -> Result<bool> {
        let result = RfidCards::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除 RFID 卡失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
