//! 预导入模块，方便使用

pub use super::attendance_logs::{
    ActiveModel as AttendanceLogActiveModel, Entity as AttendanceLogs,
    Model as AttendanceLogModel,
};
pub use super::batches::{ActiveModel as BatchActiveModel, Entity as Batches, Model as BatchModel};
pub use super::class_schedules::{
    ActiveModel as ClassScheduleActiveModel, Entity as ClassSchedules,
    Model as ClassScheduleModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::curricula::{
    ActiveModel as CurriculumActiveModel, Entity as Curricula, Model as CurriculumModel,
};
pub use super::curriculum_subjects::{
    ActiveModel as CurriculumSubjectActiveModel, Entity as CurriculumSubjects,
    Model as CurriculumSubjectModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::parent_students::{
    ActiveModel as ParentStudentActiveModel, Entity as ParentStudents,
    Model as ParentStudentModel,
};
pub use super::parents::{ActiveModel as ParentActiveModel, Entity as Parents, Model as ParentModel};
pub use super::revoked_tokens::{
    ActiveModel as RevokedTokenActiveModel, Entity as RevokedTokens, Model as RevokedTokenModel,
};
pub use super::rfid_cards::{
    ActiveModel as RfidCardActiveModel, Entity as RfidCards, Model as RfidCardModel,
};
pub use super::semesters::{
    ActiveModel as SemesterActiveModel, Entity as Semesters, Model as SemesterModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teacher_subjects::{
    ActiveModel as TeacherSubjectActiveModel, Entity as TeacherSubjects,
    Model as TeacherSubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
