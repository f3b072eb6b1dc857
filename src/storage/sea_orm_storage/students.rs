//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::batches::Entity as Batches;
use crate::entity::classes::Entity as Classes;
use crate::entity::parent_students::{Column as LinkColumn, Entity as ParentStudents};
use crate::entity::parents::{Column as ParentColumn, Entity as Parents};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    parents::entities::LinkedParent,
    students::{
        entities::{Student, StudentDetail, StudentStatus},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            student_code: Set(req.student_code),
            full_name: Set(req.full_name),
            gender: Set(req.gender),
            date_of_birth: Set(req.date_of_birth),
            email: Set(req.email),
            phone: Set(req.phone),
            address: Set(req.address),
            class_id: Set(req.class_id),
            batch_id: Set(req.batch_id),
            status: Set(StudentStatus::Studying.to_string()),
            enrolled_at: Set(req.enrolled_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 学生详情：班级、届次、家长
    pub async fn get_student_detail_impl(&self, id: i64) -> Result<Option<StudentDetail>> {
        let Some(student) = self.get_student_by_id_impl(id).await? else {
            return Ok(None);
        };

        let class = match student.class_id {
            Some(class_id) => Classes::find_by_id(class_id)
                .one(&self.db)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("查询班级失败: {e}")))?
                .map(|m| m.into_class()),
            None => None,
        };

        let batch = match student.batch_id {
            Some(batch_id) => Batches::find_by_id(batch_id)
                .one(&self.db)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("查询届次失败: {e}")))?
                .map(|m| m.into_batch()),
            None => None,
        };

        let links = ParentStudents::find()
            .filter(LinkColumn::StudentId.eq(id))
            .find_also_related(Parents)
            .order_by_asc(ParentColumn::FullName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询学生家长失败: {e}")))?;

        let parents = links
            .into_iter()
            .filter_map(|(link, parent)| {
                parent.map(|p| LinkedParent {
                    parent: p.into_parent(),
                    relationship: link.relationship,
                })
            })
            .collect();

        Ok(Some(StudentDetail {
            student,
            class,
            batch,
            parents,
        }))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(batch_id) = query.batch_id {
            select = select.filter(Column::BatchId.eq(batch_id));
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
                    .add(Column::StudentCode.contains(&escaped))
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::StudentCode);

        let (students, pagination) = self.fetch_page(select, page, size, "学生").await?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination,
        })
    }

    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::StudentCode)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
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
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
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
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(batch_id) = update.batch_id {
            model.batch_id = Set(Some(batch_id));
        }
        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
