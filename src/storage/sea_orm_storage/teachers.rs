//! 教师存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::teacher_subjects::{
    ActiveModel as TeacherSubjectActiveModel, Column as TeacherSubjectColumn,
    Entity as TeacherSubjects,
};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    teachers::{
        entities::{Teacher, TeacherDetail, TeacherStatus},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 整体替换教师可任教科目
    async fn replace_teacher_subjects<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        subject_ids: &[i64],
    ) -> Result<()> {
        TeacherSubjects::delete_many()
            .filter(TeacherSubjectColumn::TeacherId.eq(teacher_id))
            .exec(db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("清除教师科目失败: {e}")))?;

        let mut seen = std::collections::HashSet::new();
        let models: Vec<TeacherSubjectActiveModel> = subject_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|subject_id| TeacherSubjectActiveModel {
                teacher_id: Set(teacher_id),
                subject_id: Set(*subject_id),
                ..Default::default()
            })
            .collect();

        if models.is_empty() {
            return Ok(());
        }

        TeacherSubjects::insert_many(models)
            .exec_without_returning(db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("写入教师科目失败: {e}")))?;
        Ok(())
    }

    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            user_id: Set(req.user_id),
            teacher_code: Set(req.teacher_code),
            full_name: Set(req.full_name),
            email: Set(req.email),
            phone: Set(req.phone),
            status: Set(TeacherStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let teacher = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建教师失败: {e}")))?;

        Self::replace_teacher_subjects(&txn, teacher.id, &req.subject_ids).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_teacher_detail_impl(teacher.id)
            .await?
            .ok_or_else(|| SchoolSysError::not_found("教师创建后未找到"))
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 教师详情（含可任教科目）
    pub async fn get_teacher_detail_impl(&self, id: i64) -> Result<Option<TeacherDetail>> {
        let Some(teacher) = self.get_teacher_by_id_impl(id).await? else {
            return Ok(None);
        };

        let subject_ids: Vec<i64> = TeacherSubjects::find()
            .select_only()
            .column(TeacherSubjectColumn::SubjectId)
            .filter(TeacherSubjectColumn::TeacherId.eq(id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师科目失败: {e}")))?;

        let subjects = Subjects::find()
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .order_by_asc(SubjectColumn::SubjectCode)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(Some(TeacherDetail {
            teacher,
            subjects: subjects.into_iter().map(|m| m.into_subject()).collect(),
        }))
    }

    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Teachers::find();

        // 按可任教科目筛选
        if let Some(subject_id) = query.subject_id {
            select = select
                .inner_join(TeacherSubjects)
                .filter(TeacherSubjectColumn::SubjectId.eq(subject_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::TeacherCode.contains(&escaped))
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::TeacherCode);

        let (teachers, pagination) = self.fetch_page(select, page, size, "教师").await?;

        Ok(TeacherListResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination,
        })
    }

    /// 在职教师及可任教科目，供排课使用
    pub async fn list_active_teachers_with_subjects_impl(
        &self,
    ) -> Result<Vec<(Teacher, Vec<i64>)>> {
        let teachers = Teachers::find()
            .filter(Column::Status.eq(TeacherStatus::Active.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师列表失败: {e}")))?;

        let links = TeacherSubjects::find()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询教师科目失败: {e}")))?;

        let mut by_teacher: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in links {
            by_teacher
                .entry(link.teacher_id)
                .or_default()
                .push(link.subject_id);
        }

        Ok(teachers
            .into_iter()
            .map(|m| {
                let subjects = by_teacher.remove(&m.id).unwrap_or_default();
                (m.into_teacher(), subjects)
            })
            .collect())
    }

    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
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

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新教师失败: {e}")))?;

        if let Some(subject_ids) = update.subject_ids {
            Self::replace_teacher_subjects(&txn, id, &subject_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_teacher_detail_impl(id).await
    }

    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
