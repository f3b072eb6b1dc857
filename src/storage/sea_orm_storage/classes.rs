//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::batches::Entity as Batches;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::teachers::Entity as Teachers;
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassDetail, ClassListResponse},
    },
    common::pagination::normalize_page,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_name: Set(req.class_name),
            grade: Set(req.grade),
            batch_id: Set(req.batch_id),
            homeroom_teacher_id: Set(req.homeroom_teacher_id),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 班级详情：届次、班主任、学生人数
    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let Some((class, batch)) = Classes::find_by_id(class_id)
            .find_also_related(Batches)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        let homeroom_teacher = match class.homeroom_teacher_id {
            Some(teacher_id) => Teachers::find_by_id(teacher_id)
                .one(&self.db)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("查询班主任失败: {e}")))?
                .map(|m| m.into_teacher()),
            None => None,
        };

        let student_count = Students::find()
            .filter(StudentColumn::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计班级人数失败: {e}")))?;

        Ok(Some(ClassDetail {
            class: class.into_class(),
            batch: batch.map(|b| b.into_batch()),
            homeroom_teacher,
            student_count: student_count as i64,
        }))
    }

    /// 列出班级（分页）
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classes::find();

        if let Some(batch_id) = query.batch_id {
            select = select.filter(Column::BatchId.eq(batch_id));
        }

        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade));
        }

        if let Some(teacher_id) = query.homeroom_teacher_id {
            select = select.filter(Column::HomeroomTeacherId.eq(teacher_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::ClassName.contains(&escaped));
        }

        select = select
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::ClassName);

        let (classes, pagination) = self.fetch_page(select, page, size, "班级").await?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination,
        })
    }

    pub async fn list_classes_by_batch_impl(&self, batch_id: i64) -> Result<Vec<Class>> {
        let classes = Classes::find()
            .filter(Column::BatchId.eq(batch_id))
            .order_by_asc(Column::ClassName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询届次班级失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn list_classes_by_ids_impl(&self, class_ids: Option<Vec<i64>>) -> Result<Vec<Class>> {
        let mut select = Classes::find();
        if let Some(ids) = class_ids {
            select = select.filter(Column::Id.is_in(ids));
        }

        let classes = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(class_name) = update.class_name {
            model.class_name = Set(class_name);
        }
        if let Some(grade) = update.grade {
            model.grade = Set(grade);
        }
        if let Some(batch_id) = update.batch_id {
            model.batch_id = Set(Some(batch_id));
        }
        if let Some(teacher_id) = update.homeroom_teacher_id {
            model.homeroom_teacher_id = Set(Some(teacher_id));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
