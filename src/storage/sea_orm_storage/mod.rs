//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod batches;
mod classes;
mod classrooms;
mod curricula;
mod notifications;
mod parents;
mod rfid;
mod schedules;
mod semesters;
mod students;
mod subjects;
mod teachers;
mod tokens;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSysError};
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{AttendanceCounts, AttendanceLog, AttendanceStatus, NewAttendance},
        requests::AttendanceListQuery,
        responses::AttendanceListResponse,
    },
    batches::{
        entities::Batch,
        requests::{BatchListQuery, CreateBatchRequest, UpdateBatchRequest},
        responses::BatchListResponse,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassDetail, ClassListResponse},
    },
    classrooms::{
        entities::Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
        responses::ClassroomListResponse,
    },
    curricula::{
        entities::Curriculum,
        requests::{CreateCurriculumRequest, CurriculumListQuery, UpdateCurriculumRequest},
        responses::CurriculumListResponse,
    },
    notifications::{
        entities::NewNotification, requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
    parents::{
        entities::{Parent, ParentDetail},
        requests::{CreateParentRequest, ParentListQuery, UpdateParentRequest},
        responses::ParentListResponse,
    },
    rfid::{entities::RfidCard, requests::RfidListQuery, responses::RfidListResponse},
    schedules::{
        entities::{ClassSchedule, NewScheduleRow, ScheduleEntry, SlotConflict},
        requests::ScheduleListQuery,
        responses::ScheduleListResponse,
    },
    semesters::{
        entities::Semester,
        requests::{CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest},
        responses::SemesterListResponse,
    },
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    teachers::{
        entities::{Teacher, TeacherDetail},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::{SlotQuery, Storage};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    backend: &'static str,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self {
            db,
            backend: Self::backend_of(&db_url),
        })
    }

    /// 内存 SQLite（单连接），用于测试
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self {
            db,
            backend: "sqlite",
        })
    }

    fn backend_of(url: &str) -> &'static str {
        if url.starts_with("sqlite:") {
            "sqlite"
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            "mysql"
        } else {
            "postgres"
        }
    }

    /// 分页查询：返回当前页记录与分页信息
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询{what}总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSysError::database_operation(format!("查询{what}列表失败: {e}")))?;

        Ok((models, PaginationInfo::new(page, size, total)))
    }

    /// 连通性检查
    pub(crate) async fn ping_impl(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("数据库不可用: {e}")))?;
        Ok(())
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[async_trait::async_trait]
impl Storage for SeaOrmStorage {
    // 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>> {
        self.list_user_ids_by_role_impl(role).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    // Refresh token 吊销
    async fn revoke_refresh_token(
        &self,
        jti: &str,
        user_id: i64,
        expires_at: i64,
    ) -> Result<bool> {
        self.revoke_refresh_token_impl(jti, user_id, expires_at).await
    }

    async fn purge_expired_revocations(&self, now: i64) -> Result<u64> {
        self.purge_expired_revocations_impl(now).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 届次管理方法
    async fn create_batch_if_not_exists(
        &self,
        batch_code: String,
        req: CreateBatchRequest,
    ) -> Result<(Batch, bool)> {
        self.create_batch_if_not_exists_impl(batch_code, req).await
    }

    async fn get_batch_by_id(&self, id: i64) -> Result<Option<Batch>> {
        self.get_batch_by_id_impl(id).await
    }

    async fn list_batches_with_pagination(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse> {
        self.list_batches_with_pagination_impl(query).await
    }

    async fn update_batch(&self, id: i64, update: UpdateBatchRequest) -> Result<Option<Batch>> {
        self.update_batch_impl(id, update).await
    }

    async fn delete_batch(&self, id: i64) -> Result<bool> {
        self.delete_batch_impl(id).await
    }

    // 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        self.get_class_detail_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn list_classes_by_batch(&self, batch_id: i64) -> Result<Vec<Class>> {
        self.list_classes_by_batch_impl(batch_id).await
    }

    async fn list_classes_by_ids(&self, class_ids: Option<Vec<i64>>) -> Result<Vec<Class>> {
        self.list_classes_by_ids_impl(class_ids).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 科目管理方法
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 教室管理方法
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        self.create_classroom_impl(req).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_classrooms_with_pagination_impl(query).await
    }

    async fn list_all_classrooms(&self) -> Result<Vec<Classroom>> {
        self.list_all_classrooms_impl().await
    }

    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, update).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    // 学期管理方法
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(req).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn list_semesters_with_pagination(
        &self,
        query: SemesterListQuery,
    ) -> Result<SemesterListResponse> {
        self.list_semesters_with_pagination_impl(query).await
    }

    async fn update_semester(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>> {
        self.update_semester_impl(id, update).await
    }

    async fn delete_semester(&self, id: i64) -> Result<bool> {
        self.delete_semester_impl(id).await
    }

    // 教师管理方法
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
        self.create_teacher_impl(req).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_detail(&self, id: i64) -> Result<Option<TeacherDetail>> {
        self.get_teacher_detail_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn list_active_teachers_with_subjects(&self) -> Result<Vec<(Teacher, Vec<i64>)>> {
        self.list_active_teachers_with_subjects_impl().await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    // 学生管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_detail(&self, id: i64) -> Result<Option<StudentDetail>> {
        self.get_student_detail_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 家长管理方法
    async fn create_parent(&self, req: CreateParentRequest) -> Result<Parent> {
        self.create_parent_impl(req).await
    }

    async fn get_parent_by_id(&self, id: i64) -> Result<Option<Parent>> {
        self.get_parent_by_id_impl(id).await
    }

    async fn get_parent_detail(&self, id: i64) -> Result<Option<ParentDetail>> {
        self.get_parent_detail_impl(id).await
    }

    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<Parent>> {
        self.get_parent_by_user_id_impl(user_id).await
    }

    async fn list_parents_with_pagination(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse> {
        self.list_parents_with_pagination_impl(query).await
    }

    async fn update_parent(&self, id: i64, update: UpdateParentRequest) -> Result<Option<Parent>> {
        self.update_parent_impl(id, update).await
    }

    async fn delete_parent(&self, id: i64) -> Result<bool> {
        self.delete_parent_impl(id).await
    }

    async fn link_parent_student(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<bool> {
        self.link_parent_student_impl(parent_id, student_id, relationship).await
    }

    async fn unlink_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.unlink_parent_student_impl(parent_id, student_id).await
    }

    async fn list_child_ids(&self, parent_id: i64) -> Result<Vec<i64>> {
        self.list_child_ids_impl(parent_id).await
    }

    // 教学大纲管理方法
    async fn create_curriculum(&self, req: CreateCurriculumRequest) -> Result<Curriculum> {
        self.create_curriculum_impl(req).await
    }

    async fn get_curriculum_by_id(&self, id: i64) -> Result<Option<Curriculum>> {
        self.get_curriculum_by_id_impl(id).await
    }

    async fn list_curricula_with_pagination(
        &self,
        query: CurriculumListQuery,
    ) -> Result<CurriculumListResponse> {
        self.list_curricula_with_pagination_impl(query).await
    }

    async fn list_all_curricula(&self) -> Result<Vec<Curriculum>> {
        self.list_all_curricula_impl().await
    }

    async fn update_curriculum(
        &self,
        id: i64,
        update: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>> {
        self.update_curriculum_impl(id, update).await
    }

    async fn delete_curriculum(&self, id: i64) -> Result<bool> {
        self.delete_curriculum_impl(id).await
    }

    // 课表管理方法
    async fn create_schedule(&self, row: NewScheduleRow) -> Result<ClassSchedule> {
        self.create_schedule_impl(row).await
    }

    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<ClassSchedule>> {
        self.get_schedule_by_id_impl(id).await
    }

    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse> {
        self.list_schedules_with_pagination_impl(query).await
    }

    async fn list_schedule_entries_in_range(
        &self,
        class_id: Option<i64>,
        teacher_id: Option<i64>,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<ScheduleEntry>> {
        self.list_schedule_entries_in_range_impl(class_id, teacher_id, date_from, date_to).await
    }

    async fn update_schedule(&self, id: i64, row: NewScheduleRow) -> Result<Option<ClassSchedule>> {
        self.update_schedule_impl(id, row).await
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool> {
        self.delete_schedule_impl(id).await
    }

    async fn find_slot_conflict(&self, query: SlotQuery) -> Result<Option<SlotConflict>> {
        self.find_slot_conflict_impl(query).await
    }

    async fn count_schedules_for_classes(
        &self,
        semester_id: i64,
        class_ids: &[i64],
    ) -> Result<u64> {
        self.count_schedules_for_classes_impl(semester_id, class_ids).await
    }

    async fn list_semester_bookings_excluding(
        &self,
        semester_id: i64,
        class_ids: &[i64],
    ) -> Result<Vec<ClassSchedule>> {
        self.list_semester_bookings_excluding_impl(semester_id, class_ids).await
    }

    async fn write_generated_schedules(
        &self,
        semester_id: i64,
        class_ids: &[i64],
        rows: Vec<NewScheduleRow>,
        delete_existing: bool,
    ) -> Result<u64> {
        self.write_generated_schedules_impl(semester_id, class_ids, rows, delete_existing).await
    }

    async fn find_class_schedule_at(
        &self,
        class_id: i64,
        schedule_date: &str,
        period: i32,
    ) -> Result<Option<ClassSchedule>> {
        self.find_class_schedule_at_impl(class_id, schedule_date, period).await
    }

    // 考勤管理方法
    async fn create_attendance(&self, record: NewAttendance) -> Result<AttendanceLog> {
        self.create_attendance_impl(record).await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceLog>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn find_attendance(
        &self,
        student_id: i64,
        attendance_date: &str,
        schedule_id: Option<i64>,
    ) -> Result<Option<AttendanceLog>> {
        self.find_attendance_impl(student_id, attendance_date, schedule_id).await
    }

    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_attendance_with_pagination_impl(query).await
    }

    async fn upsert_attendance_batch(&self, records: Vec<NewAttendance>) -> Result<(i64, i64)> {
        self.upsert_attendance_batch_impl(records).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        note: Option<String>,
    ) -> Result<Option<AttendanceLog>> {
        self.update_attendance_impl(id, status, note).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    async fn count_attendance_by_status(
        &self,
        student_ids: Option<Vec<i64>>,
        date_from: Option<String>,
        date_to: Option<String>,
    ) -> Result<AttendanceCounts> {
        self.count_attendance_by_status_impl(student_ids, date_from, date_to).await
    }

    // RFID 卡管理方法
    async fn create_rfid_card(&self, tag: &str, student_id: i64) -> Result<RfidCard> {
        self.create_rfid_card_impl(tag, student_id).await
    }

    async fn get_rfid_card_by_id(&self, id: i64) -> Result<Option<RfidCard>> {
        self.get_rfid_card_by_id_impl(id).await
    }

    async fn get_rfid_card_by_tag(&self, tag: &str) -> Result<Option<RfidCard>> {
        self.get_rfid_card_by_tag_impl(tag).await
    }

    async fn list_rfid_cards_with_pagination(
        &self,
        query: RfidListQuery,
    ) -> Result<RfidListResponse> {
        self.list_rfid_cards_with_pagination_impl(query).await
    }

    async fn deactivate_rfid_card(&self, id: i64) -> Result<Option<RfidCard>> {
        self.deactivate_rfid_card_impl(id).await
    }

    async fn delete_rfid_card(&self, id: i64) -> Result<bool> {
        self.delete_rfid_card_impl(id).await
    }

    // 通知管理方法
    async fn create_notifications(
        &self,
        user_ids: &[i64],
        notification: NewNotification,
    ) -> Result<u64> {
        self.create_notifications_impl(user_ids, notification).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query).await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_as_read_impl(notification_id, user_id).await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_as_read_impl(user_id).await
    }

    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.delete_notification_impl(notification_id, user_id).await
    }

    async fn list_class_recipient_user_ids(
        &self,
        class_id: i64,
        include_parents: bool,
    ) -> Result<Vec<i64>> {
        self.list_class_recipient_user_ids_impl(class_id, include_parents).await
    }

    // 系统方法
    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }

    fn backend_name(&self) -> &'static str {
        self.backend
    }
}
