//! 学期存储操作
//!
//! 同一时间最多一个当前学期：设置 is_current 时在同一事务内清除其他学期的标记。

use super::SeaOrmStorage;
use crate::entity::semesters::{ActiveModel, Column, Entity as Semesters};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    semesters::{
        entities::Semester,
        requests::{CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest},
        responses::SemesterListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    async fn clear_current_semester<C: ConnectionTrait>(db: &C, except: Option<i64>) -> Result<()> {
        let mut update = Semesters::update_many()
            .col_expr(Column::IsCurrent, Expr::value(false))
            .filter(Column::IsCurrent.eq(true));
        if let Some(id) = except {
            update = update.filter(Column::Id.ne(id));
        }

        update
            .exec(db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("重置当前学期失败: {e}")))?;
        Ok(())
    }

    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_current {
            Self::clear_current_semester(&txn, None).await?;
        }

        let model = ActiveModel {
            name: Set(req.name),
            academic_year: Set(req.academic_year),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_semester())
    }

    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    pub async fn list_semesters_with_pagination_impl(
        &self,
        query: SemesterListQuery,
    ) -> Result<SemesterListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Semesters::find();

        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.as_str()));
        }

        if let Some(is_current) = query.is_current {
            select = select.filter(Column::IsCurrent.eq(is_current));
        }

        select = select.order_by_desc(Column::StartDate);

        let (semesters, pagination) = self.fetch_page(select, page, size, "学期").await?;

        Ok(SemesterListResponse {
            items: semesters.into_iter().map(|m| m.into_semester()).collect(),
            pagination,
        })
    }

    pub async fn update_semester_impl(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>> {
        if self.get_semester_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(is_current) = update.is_current {
            if is_current {
                Self::clear_current_semester(&txn, Some(id)).await?;
            }
            model.is_current = Set(is_current);
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_semester_by_id_impl(id).await
    }

    pub async fn delete_semester_impl(&self, id: i64) -> Result<bool> {
        let result = Semesters::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
