//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance_logs::{ActiveModel, Column, Entity as AttendanceLogs, Model};
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    attendance::{
        entities::{AttendanceCounts, AttendanceLog, AttendanceStatus, NewAttendance},
        requests::AttendanceListQuery,
        responses::AttendanceListResponse,
    },
    common::pagination::normalize_page,
};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};

/// 唯一索引使用的节次键
fn slot_key(schedule_id: Option<i64>) -> i64 {
    schedule_id.unwrap_or(0)
}

fn active_model(row: NewAttendance, now: i64) -> ActiveModel {
    ActiveModel {
        student_id: Set(row.student_id),
        class_id: Set(row.class_id),
        schedule_id: Set(row.schedule_id),
        attendance_date: Set(row.attendance_date),
        slot_key: Set(slot_key(row.schedule_id)),
        status: Set(row.status.to_string()),
        method: Set(row.method.to_string()),
        check_in_at: Set(row.check_in_at.map(|t| t.timestamp())),
        note: Set(row.note),
        recorded_by: Set(row.recorded_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 同一学生同一天同一节次（或全天）只保留一条记录
fn same_slot(student_id: i64, date: &str, schedule_id: Option<i64>) -> Select<AttendanceLogs> {
    AttendanceLogs::find()
        .filter(Column::StudentId.eq(student_id))
        .filter(Column::AttendanceDate.eq(date))
        .filter(Column::SlotKey.eq(slot_key(schedule_id)))
}

async fn find_same_slot<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    date: &str,
    schedule_id: Option<i64>,
) -> Result<Option<Model>> {
    same_slot(student_id, date, schedule_id)
        .one(db)
        .await
        .map_err(|e| SchoolSysError::database_operation(format!("查询考勤记录失败: {e}")))
}

impl SeaOrmStorage {
    pub async fn create_attendance_impl(&self, row: NewAttendance) -> Result<AttendanceLog> {
        let now = chrono::Utc::now().timestamp();

        let result = active_model(row, now)
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("创建考勤记录失败: {e}")))?;

        Ok(result.into_attendance_log())
    }

    pub async fn get_attendance_by_id_impl(&self, id: i64) -> Result<Option<AttendanceLog>> {
        let result = AttendanceLogs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance_log()))
    }

    pub async fn find_attendance_impl(
        &self,
        student_id: i64,
        date: &str,
        schedule_id: Option<i64>,
    ) -> Result<Option<AttendanceLog>> {
        let result = find_same_slot(&self.db, student_id, date, schedule_id).await?;
        Ok(result.map(|m| m.into_attendance_log()))
    }

    pub async fn list_attendance_with_pagination_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = AttendanceLogs::find();

        // 学生/家长只能看到限定范围内的记录
        if let Some(ids) = query.student_ids {
            select = select.filter(Column::StudentId.is_in(ids));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(ref date_from) = query.date_from {
            select = select.filter(Column::AttendanceDate.gte(date_from.as_str()));
        }
        if let Some(ref date_to) = query.date_to {
            select = select.filter(Column::AttendanceDate.lte(date_to.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let select = select
            .order_by_desc(Column::AttendanceDate)
            .order_by_desc(Column::Id);

        let (models, pagination) = self.fetch_page(select, page, size, "考勤记录").await?;

        Ok(AttendanceListResponse {
            items: models.into_iter().map(|m| m.into_attendance_log()).collect(),
            pagination,
        })
    }

    /// 批量录入考勤，已存在的记录覆盖状态与备注
    ///
    /// 返回 (新建数, 更新数)
    pub async fn upsert_attendance_batch_impl(
        &self,
        rows: Vec<NewAttendance>,
    ) -> Result<(i64, i64)> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = 0;
        let mut updated = 0;

        for row in rows {
            match find_same_slot(&txn, row.student_id, &row.attendance_date, row.schedule_id)
                .await?
            {
                Some(existing) => {
                    let mut model: ActiveModel = existing.into();
                    model.status = Set(row.status.to_string());
                    model.method = Set(row.method.to_string());
                    model.note = Set(row.note);
                    model.recorded_by = Set(row.recorded_by);
                    model.updated_at = Set(now);
                    model.update(&txn).await.map_err(|e| {
                        SchoolSysError::database_operation(format!("更新考勤记录失败: {e}"))
                    })?;
                    updated += 1;
                }
                None => {
                    active_model(row, now).insert(&txn).await.map_err(|e| {
                        SchoolSysError::database_operation(format!("创建考勤记录失败: {e}"))
                    })?;
                    created += 1;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((created, updated))
    }

    pub async fn update_attendance_impl(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        note: Option<String>,
    ) -> Result<Option<AttendanceLog>> {
        let Some(existing) = AttendanceLogs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询考勤记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(status) = status {
            model.status = Set(status.to_string());
        }
        if let Some(note) = note {
            model.note = Set(Some(note));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("更新考勤记录失败: {e}")))?;

        Ok(Some(result.into_attendance_log()))
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = AttendanceLogs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("删除考勤记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按状态分组统计考勤
    pub async fn count_attendance_by_status_impl(
        &self,
        student_ids: Option<Vec<i64>>,
        date_from: Option<String>,
        date_to: Option<String>,
    ) -> Result<AttendanceCounts> {
        let mut select = AttendanceLogs::find()
            .select_only()
            .column(Column::Status)
            .column_as(Expr::col(Column::Id).count(), "count");

        if let Some(ids) = student_ids {
            select = select.filter(Column::StudentId.is_in(ids));
        }
        if let Some(ref date_from) = date_from {
            select = select.filter(Column::AttendanceDate.gte(date_from.as_str()));
        }
        if let Some(ref date_to) = date_to {
            select = select.filter(Column::AttendanceDate.lte(date_to.as_str()));
        }

        let rows: Vec<(String, i64)> = select
            .group_by(Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("统计考勤失败: {e}")))?;

        let mut counts = AttendanceCounts::default();
        for (status, count) in rows {
            match status.parse::<AttendanceStatus>() {
                Ok(status) => counts.add(status, count),
                Err(_) => tracing::warn!("Unknown attendance status in database: {}", status),
            }
        }

        Ok(counts)
    }
}
