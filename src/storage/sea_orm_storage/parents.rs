//! 家长存储操作

use super::SeaOrmStorage;
use crate::entity::parent_students::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as ParentStudents,
};
use crate::entity::parents::{ActiveModel, Column, Entity as Parents};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    parents::{
        entities::{LinkedStudent, Parent, ParentDetail},
        requests::{CreateParentRequest, ParentListQuery, UpdateParentRequest},
        responses::ParentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_parent_impl(&self, req: CreateParentRequest) -> Result<Parent> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            address: Set(req.address),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建家长失败: {e}")))?;

        Ok(result.into_parent())
    }

    pub async fn get_parent_by_id_impl(&self, id: i64) -> Result<Option<Parent>> {
        let result = Parents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(result.map(|m| m.into_parent()))
    }

    pub async fn get_parent_by_user_id_impl(&self, user_id: i64) -> Result<Option<Parent>> {
        let result = Parents::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(result.map(|m| m.into_parent()))
    }

    /// 家长详情（含子女）
    pub async fn get_parent_detail_impl(&self, id: i64) -> Result<Option<ParentDetail>> {
        let Some(parent) = self.get_parent_by_id_impl(id).await? else {
            return Ok(None);
        };

        let links = ParentStudents::find()
            .filter(LinkColumn::ParentId.eq(id))
            .find_also_related(Students)
            .order_by_asc(StudentColumn::StudentCode)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询家长子女失败: {e}")))?;

        let children = links
            .into_iter()
            .filter_map(|(link, student)| {
                student.map(|s| LinkedStudent {
                    student: s.into_student(),
                    relationship: link.relationship,
                })
            })
            .collect();

        Ok(Some(ParentDetail { parent, children }))
    }

    pub async fn list_parents_with_pagination_impl(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Parents::find();

        if let Some(student_id) = query.student_id {
            select = select
                .inner_join(ParentStudents)
                .filter(LinkColumn::StudentId.eq(student_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::Phone.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::FullName);

        let (parents, pagination) = self.fetch_page(select, page, size, "家长").await?;

        Ok(ParentListResponse {
            items: parents.into_iter().map(|m| m.into_parent()).collect(),
            pagination,
        })
    }

    pub async fn update_parent_impl(
        &self,
        id: i64,
        update: UpdateParentRequest,
    ) -> Result<Option<Parent>> {
        if self.get_parent_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新家长失败: {e}")))?;

        self.get_parent_by_id_impl(id).await
    }

    pub async fn delete_parent_impl(&self, id: i64) -> Result<bool> {
        let result = Parents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除家长失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 关联子女，已关联时返回 false
    pub async fn link_parent_student_impl(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<bool> {
        let model = LinkActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(student_id),
            relationship: Set(relationship.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = SchoolSysError::database_operation(format!("关联子女失败: {e}"));
                if err.is_unique_violation() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn unlink_parent_student_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let result = ParentStudents::delete_many()
            .filter(LinkColumn::ParentId.eq(parent_id))
            .filter(LinkColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("解除关联失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_child_ids_impl(&self, parent_id: i64) -> Result<Vec<i64>> {
        ParentStudents::find()
            .select_only()
            .column(LinkColumn::StudentId)
            .filter(LinkColumn::ParentId.eq(parent_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询子女失败: {e}")))
    }
}
