//! 业务错误码
//!
//! 0 表示成功；1xxx 通用，2xxx 认证与用户，3xxx 组织结构，
//! 4xxx 师生档案，5xxx 排课，6xxx 考勤，7xxx 通知。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    RegisterRoleNotAllowed = 2002,
    UserNotFound = 2010,
    UserAlreadyExists = 2011,
    UserNameInvalid = 2012,
    UserEmailInvalid = 2013,
    UserPasswordInvalid = 2014,
    UserNameAlreadyExists = 2015,
    UserEmailAlreadyExists = 2016,
    UserCreationFailed = 2017,
    UserUpdateFailed = 2018,
    UserDeleteFailed = 2019,
    CanNotDeleteCurrentUser = 2020,

    // 组织结构：批次、班级、科目、教室、学期、教学大纲
    BatchNotFound = 3000,
    BatchInvalid = 3001,
    ClassNotFound = 3010,
    ClassAlreadyExists = 3011,
    ClassInvalid = 3012,
    SubjectNotFound = 3020,
    SubjectAlreadyExists = 3021,
    ClassroomNotFound = 3030,
    ClassroomAlreadyExists = 3031,
    SemesterNotFound = 3040,
    SemesterInvalid = 3041,
    CurriculumNotFound = 3050,
    CurriculumInvalid = 3051,

    // 师生档案
    StudentNotFound = 4000,
    StudentAlreadyExists = 4001,
    StudentInvalid = 4002,
    TeacherNotFound = 4010,
    TeacherAlreadyExists = 4011,
    ParentNotFound = 4020,
    ParentLinkExists = 4021,

    // 排课
    ScheduleNotFound = 5000,
    ScheduleConflict = 5001,
    ScheduleInvalid = 5002,
    ScheduleGenerationFailed = 5003,
    ScheduleGenerationInProgress = 5004,
    ScheduleAlreadyExists = 5005,
    ScheduleInUse = 5006,

    // 考勤
    AttendanceNotFound = 6000,
    AttendanceAlreadyRecorded = 6001,
    AttendanceInvalid = 6002,
    RfidCardNotFound = 6010,
    RfidCardAlreadyExists = 6011,
    RfidCardInactive = 6012,

    // 通知
    NotificationNotFound = 7000,
    NotificationInvalid = 7001,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
        assert_eq!(ErrorCode::Unauthorized.as_i32(), 1001);
        assert_eq!(ErrorCode::ScheduleConflict.as_i32(), 5001);
    }
}
