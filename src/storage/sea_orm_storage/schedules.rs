//! 课表存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::attendance_logs::{Column as AttendanceColumn, Entity as AttendanceLogs};
use crate::entity::class_schedules::{ActiveModel, Column, Entity as ClassSchedules, Model};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::classrooms::{Column as ClassroomColumn, Entity as Classrooms};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::teachers::{Column as TeacherColumn, Entity as Teachers};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    common::pagination::normalize_page,
    schedules::{
        entities::{ClassSchedule, NewScheduleRow, ScheduleEntry, SlotConflict},
        requests::ScheduleListQuery,
        responses::ScheduleListResponse,
    },
};
use crate::storage::SlotQuery;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};

// 单条 INSERT 的最大行数
const INSERT_CHUNK: usize = 500;

fn active_model(row: NewScheduleRow, now: i64) -> ActiveModel {
    ActiveModel {
        semester_id: Set(row.semester_id),
        class_id: Set(row.class_id),
        subject_id: Set(row.subject_id),
        teacher_id: Set(row.teacher_id),
        classroom_id: Set(row.classroom_id),
        schedule_date: Set(row.schedule_date),
        weekday: Set(row.weekday),
        period: Set(row.period),
        is_free_time: Set(row.is_free_time),
        note: Set(row.note),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 查询一组ID对应的名称
    async fn lookup_names<E, C>(
        &self,
        ids: HashSet<i64>,
        id_col: C,
        name_col: C,
        what: &str,
    ) -> Result<HashMap<i64, String>>
    where
        E: EntityTrait<Column = C>,
        C: ColumnTrait,
    {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = E::find()
            .select_only()
            .column(id_col)
            .column(name_col)
            .filter(id_col.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询{what}名称失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    /// 为课表记录补充班级、科目、教师、教室名称
    async fn into_entries(&self, models: Vec<Model>) -> Result<Vec<ScheduleEntry>> {
        let class_ids = models.iter().map(|m| m.class_id).collect();
        let subject_ids = models.iter().filter_map(|m| m.subject_id).collect();
        let teacher_ids = models.iter().filter_map(|m| m.teacher_id).collect();
        let classroom_ids = models.iter().filter_map(|m| m.classroom_id).collect();

        let class_names = self
            .lookup_names::<Classes, _>(class_ids, ClassColumn::Id, ClassColumn::ClassName, "班级")
            .await?;
        let subject_names = self
            .lookup_names::<Subjects, _>(subject_ids, SubjectColumn::Id, SubjectColumn::Name, "科目")
            .await?;
        let teacher_names = self
            .lookup_names::<Teachers, _>(
                teacher_ids,
                TeacherColumn::Id,
                TeacherColumn::FullName,
                "教师",
            )
            .await?;
        let classroom_names = self
            .lookup_names::<Classrooms, _>(
                classroom_ids,
                ClassroomColumn::Id,
                ClassroomColumn::Name,
                "教室",
            )
            .await?;

        Ok(models
            .into_iter()
            .map(|m| ScheduleEntry {
                class_name: class_names.get(&m.class_id).cloned(),
                subject_name: m.subject_id.and_then(|id| subject_names.get(&id).cloned()),
                teacher_name: m.teacher_id.and_then(|id| teacher_names.get(&id).cloned()),
                classroom_name: m.classroom_id.and_then(|id| classroom_names.get(&id).cloned()),
                schedule: m.into_schedule(),
            })
            .collect())
    }

    fn ordered(select: Select<ClassSchedules>) -> Select<ClassSchedules> {
        select
            .order_by_asc(Column::ScheduleDate)
            .order_by_asc(Column::Period)
            .order_by_asc(Column::ClassId)
    }

    pub async fn create_schedule_impl(&self, row: NewScheduleRow) -> Result<ClassSchedule> {
        let now = chrono::Utc::now().timestamp();

        let result = active_model(row, now)
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建课表失败: {e}")))?;

        Ok(result.into_schedule())
    }

    pub async fn get_schedule_by_id_impl(&self, id: i64) -> Result<Option<ClassSchedule>> {
        let result = ClassSchedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule()))
    }

    pub async fn list_schedules_with_pagination_impl(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ClassSchedules::find();

        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(Column::ClassroomId.eq(classroom_id));
        }
        // ISO 日期字符串按字典序即按时间序
        if let Some(ref date_from) = query.date_from {
            select = select.filter(Column::ScheduleDate.gte(date_from.as_str()));
        }
        if let Some(ref date_to) = query.date_to {
            select = select.filter(Column::ScheduleDate.lte(date_to.as_str()));
        }
        if let Some(weekday) = query.weekday {
            select = select.filter(Column::Weekday.eq(weekday));
        }

        let (models, pagination) = self
            .fetch_page(Self::ordered(select), page, size, "课表")
            .await?;

        Ok(ScheduleListResponse {
            items: self.into_entries(models).await?,
            pagination,
        })
    }

    pub async fn list_schedule_entries_in_range_impl(
        &self,
        class_id: Option<i64>,
        teacher_id: Option<i64>,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<ScheduleEntry>> {
        let mut select = ClassSchedules::find()
            .filter(Column::ScheduleDate.gte(date_from))
            .filter(Column::ScheduleDate.lte(date_to));

        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let models = Self::ordered(select)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询周课表失败: {e}")))?;

        self.into_entries(models).await
    }

    /// 用新的字段整体覆盖课表记录
    pub async fn update_schedule_impl(
        &self,
        id: i64,
        row: NewScheduleRow,
    ) -> Result<Option<ClassSchedule>> {
        if self.get_schedule_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = active_model(row, chrono::Utc::now().timestamp());
        model.id = Set(id);
        model.created_at = sea_orm::ActiveValue::NotSet;

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新课表失败: {e}")))?;

        self.get_schedule_by_id_impl(id).await
    }

    pub async fn delete_schedule_impl(&self, id: i64) -> Result<bool> {
        let result = ClassSchedules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 依次检查班级、教师、教室在该节次是否已被占用
    pub async fn find_slot_conflict_impl(&self, query: SlotQuery) -> Result<Option<SlotConflict>> {
        let checks = [
            (SlotConflict::Class, Column::ClassId, query.class_id),
            (SlotConflict::Teacher, Column::TeacherId, query.teacher_id),
            (SlotConflict::Classroom, Column::ClassroomId, query.classroom_id),
        ];

        for (kind, column, value) in checks {
            let Some(value) = value else {
                continue;
            };

            let mut select = ClassSchedules::find()
                .filter(Column::ScheduleDate.eq(query.schedule_date.as_str()))
                .filter(Column::Period.eq(query.period))
                .filter(column.eq(value));
            if let Some(exclude_id) = query.exclude_id {
                select = select.filter(Column::Id.ne(exclude_id));
            }

            let taken = select
                .count(&self.db)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("检查课表冲突失败: {e}")))?;

            if taken > 0 {
                return Ok(Some(kind));
            }
        }

        Ok(None)
    }

    pub async fn count_schedules_for_classes_impl(
        &self,
        semester_id: i64,
        class_ids: &[i64],
    ) -> Result<u64> {
        ClassSchedules::find()
            .filter(Column::SemesterId.eq(semester_id))
            .filter(Column::ClassId.is_in(class_ids.iter().copied()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计课表失败: {e}")))
    }

    pub async fn list_semester_bookings_excluding_impl(
        &self,
        semester_id: i64,
        class_ids: &[i64],
    ) -> Result<Vec<ClassSchedule>> {
        let models = ClassSchedules::find()
            .filter(Column::SemesterId.eq(semester_id))
            .filter(Column::ClassId.is_not_in(class_ids.iter().copied()))
            .filter(Column::IsFreeTime.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询已占用课表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_schedule()).collect())
    }

    /// 单事务写入自动排课结果
    pub async fn write_generated_schedules_impl(
        &self,
        semester_id: i64,
        class_ids: &[i64],
        rows: Vec<NewScheduleRow>,
        delete_existing: bool,
    ) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        if delete_existing {
            // 已有考勤挂在旧课表上时拒绝覆盖，避免节次考勤失去归属
            let old_rows = ClassSchedules::find()
                .select_only()
                .column(Column::Id)
                .filter(Column::SemesterId.eq(semester_id))
                .filter(Column::ClassId.is_in(class_ids.iter().copied()))
                .into_query();
            let referenced = AttendanceLogs::find()
                .filter(AttendanceColumn::ScheduleId.in_subquery(old_rows))
                .count(&txn)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("查询考勤引用失败: {e}")))?;
            if referenced > 0 {
                txn.rollback().await.map_err(|e| {
                    SchoolSysError::database_operation(format!("回滚事务失败: {e}"))
                })?;
                return Err(SchoolSysError::conflict(format!(
                    "{referenced} attendance records refer to the existing timetable"
                )));
            }

            let deleted = ClassSchedules::delete_many()
                .filter(Column::SemesterId.eq(semester_id))
                .filter(Column::ClassId.is_in(class_ids.iter().copied()))
                .exec(&txn)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("删除旧课表失败: {e}")))?;
            tracing::debug!(
                "Removed {} existing schedule rows for semester {}",
                deleted.rows_affected,
                semester_id
            );
        }

        let mut written = 0u64;
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            let chunk: Vec<ActiveModel> = rows
                .by_ref()
                .take(INSERT_CHUNK)
                .map(|row| active_model(row, now))
                .collect();
            let count = chunk.len() as u64;

            ClassSchedules::insert_many(chunk)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| SchoolSysError::database_operation(format!("写入课表失败: {e}")))?;
            written += count;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(written)
    }

    pub async fn find_class_schedule_at_impl(
        &self,
        class_id: i64,
        schedule_date: &str,
        period: i32,
    ) -> Result<Option<ClassSchedule>> {
        let result = ClassSchedules::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::ScheduleDate.eq(schedule_date))
            .filter(Column::Period.eq(period))
            .filter(Column::IsFreeTime.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule()))
    }
}
