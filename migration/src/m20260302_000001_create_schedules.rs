use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_tables::{
    Batches, Classes, Classrooms, Students, Subjects, Teachers, Users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 学期表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semesters::Name).string().not_null())
                    .col(ColumnDef::new(Semesters::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Semesters::StartDate).string().not_null())
                    .col(ColumnDef::new(Semesters::EndDate).string().not_null())
                    .col(ColumnDef::new(Semesters::IsCurrent).boolean().not_null())
                    .col(ColumnDef::new(Semesters::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Semesters::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 教学大纲表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Curricula::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Curricula::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Curricula::Name).string().not_null())
                    .col(ColumnDef::new(Curricula::BatchId).big_integer().null())
                    .col(ColumnDef::new(Curricula::Grade).integer().not_null())
                    .col(ColumnDef::new(Curricula::Description).text().null())
                    .col(ColumnDef::new(Curricula::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Curricula::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Curricula::Table, Curricula::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CurriculumSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CurriculumSubjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CurriculumSubjects::CurriculumId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurriculumSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurriculumSubjects::SessionsPerWeek)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CurriculumSubjects::Table, CurriculumSubjects::CurriculumId)
                            .to(Curricula::Table, Curricula::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CurriculumSubjects::Table, CurriculumSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课表表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSchedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::SemesterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSchedules::SubjectId).big_integer().null())
                    .col(ColumnDef::new(ClassSchedules::TeacherId).big_integer().null())
                    .col(
                        ColumnDef::new(ClassSchedules::ClassroomId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::ScheduleDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSchedules::Weekday).integer().not_null())
                    .col(ColumnDef::new(ClassSchedules::Period).integer().not_null())
                    .col(
                        ColumnDef::new(ClassSchedules::IsFreeTime)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSchedules::Note).text().null())
                    .col(
                        ColumnDef::new(ClassSchedules::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考勤记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(AttendanceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceLogs::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceLogs::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(AttendanceLogs::ScheduleId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceLogs::AttendanceDate)
                            .string()
                            .not_null(),
                    )
                    // 节次键：课表ID，全天记录为 0
                    .col(
                        ColumnDef::new(AttendanceLogs::SlotKey)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AttendanceLogs::Status).string().not_null())
                    .col(ColumnDef::new(AttendanceLogs::Method).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceLogs::CheckInAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AttendanceLogs::Note).text().null())
                    .col(
                        ColumnDef::new(AttendanceLogs::RecordedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceLogs::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceLogs::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceLogs::Table, AttendanceLogs::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceLogs::Table, AttendanceLogs::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceLogs::Table, AttendanceLogs::ScheduleId)
                            .to(ClassSchedules::Table, ClassSchedules::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceLogs::Table, AttendanceLogs::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_curriculum_subjects_unique")
                    .table(CurriculumSubjects::Table)
                    .col(CurriculumSubjects::CurriculumId)
                    .col(CurriculumSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 同一时段内班级、教师、教室各自最多一节课（空值不参与唯一约束）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_class_slot")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::ClassId)
                    .col(ClassSchedules::ScheduleDate)
                    .col(ClassSchedules::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_teacher_slot")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::TeacherId)
                    .col(ClassSchedules::ScheduleDate)
                    .col(ClassSchedules::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_classroom_slot")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::ClassroomId)
                    .col(ClassSchedules::ScheduleDate)
                    .col(ClassSchedules::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_semester_id")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::SemesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_logs_student_slot")
                    .table(AttendanceLogs::Table)
                    .col(AttendanceLogs::StudentId)
                    .col(AttendanceLogs::AttendanceDate)
                    .col(AttendanceLogs::SlotKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttendanceLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CurriculumSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Curricula::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Semesters {
    #[sea_orm(iden = "semesters")]
    Table,
    Id,
    Name,
    AcademicYear,
    StartDate,
    EndDate,
    IsCurrent,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Curricula {
    #[sea_orm(iden = "curricula")]
    Table,
    Id,
    Name,
    BatchId,
    Grade,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CurriculumSubjects {
    #[sea_orm(iden = "curriculum_subjects")]
    Table,
    Id,
    CurriculumId,
    SubjectId,
    SessionsPerWeek,
}

#[derive(DeriveIden)]
enum ClassSchedules {
    #[sea_orm(iden = "class_schedules")]
    Table,
    Id,
    SemesterId,
    ClassId,
    SubjectId,
    TeacherId,
    ClassroomId,
    ScheduleDate,
    Weekday,
    Period,
    IsFreeTime,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceLogs {
    #[sea_orm(iden = "attendance_logs")]
    Table,
    Id,
    StudentId,
    ClassId,
    ScheduleId,
    AttendanceDate,
    SlotKey,
    Status,
    Method,
    CheckInAt,
    Note,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}
