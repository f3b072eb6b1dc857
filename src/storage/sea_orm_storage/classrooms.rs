//! 教室存储操作

use super::SeaOrmStorage;
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    classrooms::{
        entities::Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
        responses::ClassroomListResponse,
    },
    common::pagination::normalize_page,
};
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_classroom_impl(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            building: Set(req.building),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建教室失败: {e}")))?;

        Ok(result.into_classroom())
    }

    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教室失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    pub async fn list_classrooms_with_pagination_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classrooms::find();

        if let Some(ref building) = query.building {
            select = select.filter(Column::Building.eq(building.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select.order_by_asc(Column::Name);

        let (rooms, pagination) = self.fetch_page(select, page, size, "教室").await?;

        Ok(ClassroomListResponse {
            items: rooms.into_iter().map(|m| m.into_classroom()).collect(),
            pagination,
        })
    }

    pub async fn list_all_classrooms_impl(&self) -> Result<Vec<Classroom>> {
        let rooms = Classrooms::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教室列表失败: {e}")))?;

        Ok(rooms.into_iter().map(|m| m.into_classroom()).collect())
    }

    pub async fn update_classroom_impl(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        if self.get_classroom_by_id_impl(id).await?.is_none() {
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
        if let Some(building) = update.building {
            model.building = Set(Some(building));
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新教室失败: {e}")))?;

        self.get_classroom_by_id_impl(id).await
    }

    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除教室失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
