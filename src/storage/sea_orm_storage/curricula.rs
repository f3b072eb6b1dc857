//! 教学大纲存储操作
//!
//! 大纲与其科目行一起读写；更新科目行时整体替换，并与大纲本身处于同一事务。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::curricula::{ActiveModel, Column, Entity as Curricula, Model};
use crate::entity::curriculum_subjects::{
    ActiveModel as LineActiveModel, Column as LineColumn, Entity as CurriculumSubjects,
    Model as LineModel,
};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    curricula::{
        entities::{Curriculum, CurriculumSubject},
        requests::{CreateCurriculumRequest, CurriculumListQuery, UpdateCurriculumRequest},
        responses::CurriculumListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    async fn write_curriculum_lines<C: ConnectionTrait>(
        db: &C,
        curriculum_id: i64,
        lines: &[CurriculumSubject],
    ) -> Result<()> {
        CurriculumSubjects::delete_many()
            .filter(LineColumn::CurriculumId.eq(curriculum_id))
            .exec(db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("清除大纲科目失败: {e}")))?;

        if lines.is_empty() {
            return Ok(());
        }

        let models = lines.iter().map(|line| LineActiveModel {
            curriculum_id: Set(curriculum_id),
            subject_id: Set(line.subject_id),
            sessions_per_week: Set(line.sessions_per_week),
            ..Default::default()
        });

        CurriculumSubjects::insert_many(models)
            .exec_without_returning(db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("写入大纲科目失败: {e}")))?;
        Ok(())
    }

    /// 为一组大纲加载科目行
    async fn attach_lines(&self, curricula: Vec<Model>) -> Result<Vec<Curriculum>> {
        let ids: Vec<i64> = curricula.iter().map(|c| c.id).collect();
        let lines = CurriculumSubjects::find()
            .filter(LineColumn::CurriculumId.is_in(ids))
            .order_by_asc(LineColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询大纲科目失败: {e}")))?;

        let mut by_curriculum: HashMap<i64, Vec<LineModel>> = HashMap::new();
        for line in lines {
            by_curriculum
                .entry(line.curriculum_id)
                .or_default()
                .push(line);
        }

        Ok(curricula
            .into_iter()
            .map(|c| {
                let lines = by_curriculum.remove(&c.id).unwrap_or_default();
                c.into_curriculum(lines)
            })
            .collect())
    }

    pub async fn create_curriculum_impl(&self, req: CreateCurriculumRequest) -> Result<Curriculum> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            name: Set(req.name),
            batch_id: Set(req.batch_id),
            grade: Set(req.grade),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let curriculum = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建大纲失败: {e}")))?;

        Self::write_curriculum_lines(&txn, curriculum.id, &req.subjects).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_curriculum_by_id_impl(curriculum.id)
            .await?
            .ok_or_else(|| SchoolSysError::not_found("大纲创建后未找到"))
    }

    pub async fn get_curriculum_by_id_impl(&self, id: i64) -> Result<Option<Curriculum>> {
        let Some(model) = Curricula::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询大纲失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.attach_lines(vec![model]).await?.into_iter().next())
    }

    pub async fn list_curricula_with_pagination_impl(
        &self,
        query: CurriculumListQuery,
    ) -> Result<CurriculumListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Curricula::find();

        if let Some(batch_id) = query.batch_id {
            select = select.filter(Column::BatchId.eq(batch_id));
        }

        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade));
        }

        select = select.order_by_asc(Column::Grade).order_by_asc(Column::Id);

        let (models, pagination) = self.fetch_page(select, page, size, "大纲").await?;

        Ok(CurriculumListResponse {
            items: self.attach_lines(models).await?,
            pagination,
        })
    }

    pub async fn list_all_curricula_impl(&self) -> Result<Vec<Curriculum>> {
        let models = Curricula::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询大纲列表失败: {e}")))?;

        self.attach_lines(models).await
    }

    pub async fn update_curriculum_impl(
        &self,
        id: i64,
        update: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>> {
        if Curricula::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询大纲失败: {e}")))?
            .is_none()
        {
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
        if let Some(batch_id) = update.batch_id {
            model.batch_id = Set(Some(batch_id));
        }
        if let Some(grade) = update.grade {
            model.grade = Set(grade);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新大纲失败: {e}")))?;

        if let Some(subjects) = update.subjects {
            Self::write_curriculum_lines(&txn, id, &subjects).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_curriculum_by_id_impl(id).await
    }

    pub async fn delete_curriculum_impl(&self, id: i64) -> Result<bool> {
        let result = Curricula::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除大纲失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
