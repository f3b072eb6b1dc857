use std::sync::Arc;

use crate::models::{
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 课表占用查询条件，None 的维度不参与检查
#[derive(Debug, Clone, Default)]
pub struct SlotQuery {
    pub schedule_date: String,
    pub period: i32,
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub classroom_id: Option<i64>,
    /// 更新时排除自身
    pub exclude_id: Option<i64>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 列出某角色全部用户ID
    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// Refresh token 吊销
    // 吊销令牌；令牌此前已被吊销时返回 false
    async fn revoke_refresh_token(&self, jti: &str, user_id: i64, expires_at: i64)
    -> Result<bool>;
    // 清理已自然过期的吊销记录，返回删除条数
    async fn purge_expired_revocations(&self, now: i64) -> Result<u64>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 届次管理方法
    // 按编码创建届次，已存在时返回 (已有记录, false)
    async fn create_batch_if_not_exists(
        &self,
        batch_code: String,
        req: CreateBatchRequest,
    ) -> Result<(Batch, bool)>;
    async fn get_batch_by_id(&self, id: i64) -> Result<Option<Batch>>;
    async fn list_batches_with_pagination(&self, query: BatchListQuery)
    -> Result<BatchListResponse>;
    async fn update_batch(&self, id: i64, update: UpdateBatchRequest) -> Result<Option<Batch>>;
    async fn delete_batch(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 班级详情（关联届次、班主任、学生人数）
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 按届次列出班级
    async fn list_classes_by_batch(&self, batch_id: i64) -> Result<Vec<Class>>;
    // 按ID列出班级，None 表示全部
    async fn list_classes_by_ids(&self, class_ids: Option<Vec<i64>>) -> Result<Vec<Class>>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 科目管理方法
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 教室管理方法
    async fn create_classroom(&self, req: CreateClassroomRequest) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    async fn list_all_classrooms(&self) -> Result<Vec<Classroom>>;
    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;

    /// 学期管理方法（设为当前学期时清除其他学期的标记）
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester>;
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    async fn list_semesters_with_pagination(
        &self,
        query: SemesterListQuery,
    ) -> Result<SemesterListResponse>;
    async fn update_semester(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>>;
    async fn delete_semester(&self, id: i64) -> Result<bool>;

    /// 教师管理方法
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_detail(&self, id: i64) -> Result<Option<TeacherDetail>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    // 在职教师及其可任教科目ID
    async fn list_active_teachers_with_subjects(&self) -> Result<Vec<(Teacher, Vec<i64>)>>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>>;
    async fn delete_teacher(&self, id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_detail(&self, id: i64) -> Result<Option<StudentDetail>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 家长管理方法
    async fn create_parent(&self, req: CreateParentRequest) -> Result<Parent>;
    async fn get_parent_by_id(&self, id: i64) -> Result<Option<Parent>>;
    async fn get_parent_detail(&self, id: i64) -> Result<Option<ParentDetail>>;
    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<Parent>>;
    async fn list_parents_with_pagination(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse>;
    async fn update_parent(&self, id: i64, update: UpdateParentRequest)
    -> Result<Option<Parent>>;
    async fn delete_parent(&self, id: i64) -> Result<bool>;
    // 关联子女，已关联时返回 false
    async fn link_parent_student(
        &self,
        parent_id: i64,
        student_id: i64,
        relationship: &str,
    ) -> Result<bool>;
    async fn unlink_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn list_child_ids(&self, parent_id: i64) -> Result<Vec<i64>>;

    /// 教学大纲管理方法
    async fn create_curriculum(&self, req: CreateCurriculumRequest) -> Result<Curriculum>;
    async fn get_curriculum_by_id(&self, id: i64) -> Result<Option<Curriculum>>;
    async fn list_curricula_with_pagination(
        &self,
        query: CurriculumListQuery,
    ) -> Result<CurriculumListResponse>;
    async fn list_all_curricula(&self) -> Result<Vec<Curriculum>>;
    async fn update_curriculum(
        &self,
        id: i64,
        update: UpdateCurriculumRequest,
    ) -> Result<Option<Curriculum>>;
    async fn delete_curriculum(&self, id: i64) -> Result<bool>;

    /// 课表管理方法
    async fn create_schedule(&self, row: NewScheduleRow) -> Result<ClassSchedule>;
    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<ClassSchedule>>;
    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse>;
    // 班级或教师在日期区间内的课表（含关联名称）
    async fn list_schedule_entries_in_range(
        &self,
        class_id: Option<i64>,
        teacher_id: Option<i64>,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<ScheduleEntry>>;
    async fn update_schedule(&self, id: i64, row: NewScheduleRow)
    -> Result<Option<ClassSchedule>>;
    async fn delete_schedule(&self, id: i64) -> Result<bool>;
    // 检查班级/教师/教室在同一日期同一节次是否已被占用
    async fn find_slot_conflict(&self, query: SlotQuery) -> Result<Option<SlotConflict>>;
    // 某学期内指定班级已有的课表行数
    async fn count_schedules_for_classes(&self, semester_id: i64, class_ids: &[i64])
    -> Result<u64>;
    // 某学期内其他班级已占用的非自习课表
    async fn list_semester_bookings_excluding(
        &self,
        semester_id: i64,
        class_ids: &[i64],
    ) -> Result<Vec<ClassSchedule>>;
    // 单事务写入自动排课结果，delete_existing 为真时先删除指定班级的旧课表
    async fn write_generated_schedules(
        &self,
        semester_id: i64,
        class_ids: &[i64],
        rows: Vec<NewScheduleRow>,
        delete_existing: bool,
    ) -> Result<u64>;
    // 班级在某日某节的课表
    async fn find_class_schedule_at(
        &self,
        class_id: i64,
        schedule_date: &str,
        period: i32,
    ) -> Result<Option<ClassSchedule>>;

    /// 考勤管理方法
    async fn create_attendance(&self, record: NewAttendance) -> Result<AttendanceLog>;
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceLog>>;
    // 查找学生在某日（某节课）的考勤
    async fn find_attendance(
        &self,
        student_id: i64,
        attendance_date: &str,
        schedule_id: Option<i64>,
    ) -> Result<Option<AttendanceLog>>;
    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    // 批量写入点名结果，已有记录更新状态，返回 (新增, 更新)
    async fn upsert_attendance_batch(&self, records: Vec<NewAttendance>) -> Result<(i64, i64)>;
    async fn update_attendance(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        note: Option<String>,
    ) -> Result<Option<AttendanceLog>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;
    // 按状态统计考勤
    async fn count_attendance_by_status(
        &self,
        student_ids: Option<Vec<i64>>,
        date_from: Option<String>,
        date_to: Option<String>,
    ) -> Result<AttendanceCounts>;

    /// RFID 卡管理方法
    async fn create_rfid_card(&self, tag: &str, student_id: i64) -> Result<RfidCard>;
    async fn get_rfid_card_by_id(&self, id: i64) -> Result<Option<RfidCard>>;
    async fn get_rfid_card_by_tag(&self, tag: &str) -> Result<Option<RfidCard>>;
    async fn list_rfid_cards_with_pagination(
        &self,
        query: RfidListQuery,
    ) -> Result<RfidListResponse>;
    async fn deactivate_rfid_card(&self, id: i64) -> Result<Option<RfidCard>>;
    async fn delete_rfid_card(&self, id: i64) -> Result<bool>;

    /// 通知管理方法
    // 向多个用户发送同一通知，返回写入条数
    async fn create_notifications(
        &self,
        user_ids: &[i64],
        notification: NewNotification,
    ) -> Result<u64>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64)
    -> Result<bool>;
    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool>;
    // 班级学生（及其家长）的账号ID
    async fn list_class_recipient_user_ids(
        &self,
        class_id: i64,
        include_parents: bool,
    ) -> Result<Vec<i64>>;

    /// 系统方法
    async fn ping(&self) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
