//! 通知存储操作

use std::collections::BTreeSet;

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::entity::parent_students::{Entity as ParentStudents, Relation as LinkRelation};
use crate::entity::parents::{Column as ParentColumn, Entity as Parents};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    notifications::{
        entities::NewNotification, requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};

const INSERT_CHUNK: usize = 500;

impl SeaOrmStorage {
    /// 为每个接收人写入一条通知
    pub async fn create_notifications_impl(
        &self,
        user_ids: &[i64],
        notification: NewNotification,
    ) -> Result<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        for chunk in user_ids.chunks(INSERT_CHUNK) {
            let models = chunk.iter().map(|&user_id| ActiveModel {
                user_id: Set(user_id),
                notification_type: Set(notification.notification_type.to_string()),
                title: Set(notification.title.clone()),
                content: Set(notification.content.clone()),
                reference_type: Set(notification.reference_type.clone()),
                reference_id: Set(notification.reference_id),
                is_read: Set(false),
                created_by: Set(notification.created_by),
                created_at: Set(now),
                ..Default::default()
            });

            Notifications::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("批量创建通知失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(user_ids.len() as u64)
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        // 未读筛选
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let (models, pagination) = self.fetch_page(select, page, size, "通知").await?;

        Ok(NotificationListResponse {
            items: models.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读（仅限本人的通知）
    pub async fn mark_notification_as_read_impl(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_as_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("标记全部通知已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }

    /// 删除通知（仅限本人的通知）
    pub async fn delete_notification_impl(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级通知的接收人：有账号的学生，以及可选的关联家长
    pub async fn list_class_recipient_user_ids_impl(
        &self,
        class_id: i64,
        include_parents: bool,
    ) -> Result<Vec<i64>> {
        let student_user_ids: Vec<Option<i64>> = Students::find()
            .select_only()
            .column(StudentColumn::UserId)
            .filter(StudentColumn::ClassId.eq(class_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级学生失败: {e}")))?;

        let mut recipients: BTreeSet<i64> = student_user_ids.into_iter().flatten().collect();

        if include_parents {
            let parent_user_ids: Vec<Option<i64>> = Parents::find()
                .select_only()
                .column(ParentColumn::UserId)
                .inner_join(ParentStudents)
                .join(JoinType::InnerJoin, LinkRelation::Student.def())
                .filter(StudentColumn::ClassId.eq(class_id))
                .distinct()
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("查询学生家长失败: {e}")))?;

            recipients.extend(parent_user_ids.into_iter().flatten());
        }

        Ok(recipients.into_iter().collect())
    }
}
