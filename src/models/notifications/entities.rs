use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

/// 通知类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    #[default]
    Announcement,
    Schedule,
    Attendance,
    System,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Announcement => write!(f, "announcement"),
            NotificationType::Schedule => write!(f, "schedule"),
            NotificationType::Attendance => write!(f, "attendance"),
            NotificationType::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcement" => Ok(NotificationType::Announcement),
            "schedule" => Ok(NotificationType::Schedule),
            "attendance" => Ok(NotificationType::Attendance),
            "system" => Ok(NotificationType::System),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

/// 通知实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 通知接收对象
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationTarget {
    /// 指定用户
    Users { user_ids: Vec<i64> },
    /// 某角色的全部用户
    Role { role: UserRole },
    /// 某班级学生的账号，可附带其家长
    Class {
        class_id: i64,
        #[serde(default)]
        include_parents: bool,
    },
}

/// 待写入的通知内容（按接收人展开前）
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_tagged_by_type() {
        let target: NotificationTarget =
            serde_json::from_str(r#"{"type":"class","class_id":3}"#).expect("valid target");
        match target {
            NotificationTarget::Class {
                class_id,
                include_parents,
            } => {
                assert_eq!(class_id, 3);
                assert!(!include_parents);
            }
            other => panic!("unexpected target: {other:?}"),
        }

        let target: NotificationTarget =
            serde_json::from_str(r#"{"type":"role","role":"parent"}"#).expect("valid target");
        assert!(matches!(
            target,
            NotificationTarget::Role {
                role: UserRole::Parent
            }
        ));
    }
}
