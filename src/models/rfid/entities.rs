use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rfid.ts")]
pub struct RfidCard {
    pub id: i64,
    pub tag: String,
    pub student_id: i64,
    pub is_active: bool,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}
