//! RFID 卡实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rfid_cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub tag: String,
    pub student_id: i64,
    pub is_active: bool,
    pub assigned_at: i64,
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
    pub fn into_rfid_card(self) -> crate::models::rfid::entities::RfidCard {
        crate::models::rfid::entities::RfidCard {
            id: self.id,
            tag: self.tag,
            student_id: self.student_id,
            is_active: self.is_active,
            assigned_at: super::to_datetime(self.assigned_at),
        }
    }
}
