use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Late => write!(f, "late"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Excused => write!(f, "excused"),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            "excused" => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

// 考勤记录方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceMethod {
    Manual,
    Rfid,
}

impl std::fmt::Display for AttendanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceMethod::Manual => write!(f, "manual"),
            AttendanceMethod::Rfid => write!(f, "rfid"),
        }
    }
}

impl std::str::FromStr for AttendanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AttendanceMethod::Manual),
            "rfid" => Ok(AttendanceMethod::Rfid),
            _ => Err(format!("Invalid attendance method: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceLog {
    pub id: i64,
    pub student_id: i64,
    pub class_id: Option<i64>,
    // 为空表示按天记录
    pub schedule_id: Option<i64>,
    pub attendance_date: String,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub check_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的考勤记录
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub schedule_id: Option<i64>,
    pub attendance_date: String,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub check_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
}

/// 按状态统计的考勤数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceCounts {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
}

impl AttendanceCounts {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Late => self.late += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Excused => self.excused += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.present + self.late + self.absent + self.excused
    }

    /// 出勤率（万分比）：(出席 + 迟到) / 总数，无记录时为 0
    pub fn rate_basis_points(&self) -> i64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.present + self.late) * 10_000 / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_counts_late_as_attended() {
        let mut counts = AttendanceCounts::default();
        counts.add(AttendanceStatus::Present, 6);
        counts.add(AttendanceStatus::Late, 1);
        counts.add(AttendanceStatus::Absent, 2);
        counts.add(AttendanceStatus::Excused, 1);
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.rate_basis_points(), 7_000);
    }

    #[test]
    fn test_rate_is_zero_without_records() {
        assert_eq!(AttendanceCounts::default().rate_basis_points(), 0);
    }

    #[test]
    fn test_rate_truncates() {
        let counts = AttendanceCounts {
            present: 2,
            late: 0,
            absent: 1,
            excused: 0,
        };
        assert_eq!(counts.rate_basis_points(), 6_666);
    }
}
