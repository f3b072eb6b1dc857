//! 考勤记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub schedule_id: Option<i64>,
    pub attendance_date: String,
    // 课表ID，全天记录为 0
    pub slot_key: i64,
    pub status: String,
    pub method: String,
    pub check_in_at: Option<i64>,
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance_log(self) -> crate::models::attendance::entities::AttendanceLog {
        use crate::models::attendance::entities::{
            AttendanceLog, AttendanceMethod, AttendanceStatus,
        };

        AttendanceLog {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            schedule_id: self.schedule_id,
            attendance_date: self.attendance_date,
            status: self
                .status
                .parse::<AttendanceStatus>()
                .unwrap_or(AttendanceStatus::Absent),
            method: self
                .method
                .parse::<AttendanceMethod>()
                .unwrap_or(AttendanceMethod::Manual),
            check_in_at: self.check_in_at.map(super::to_datetime),
            note: self.note,
            recorded_by: self.recorded_by,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
