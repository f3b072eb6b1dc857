//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    #[sea_orm(unique)]
    pub student_code: String,
    pub full_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub class_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub status: String,
    pub enrolled_at: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id"
    )]
    Batch,
    #[sea_orm(has_many = "super::parent_students::Entity")]
    ParentStudents,
    #[sea_orm(has_many = "super::rfid_cards::Entity")]
    RfidCards,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::parent_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParentStudents.def()
    }
}

impl Related<super::rfid_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RfidCards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{Student, StudentStatus};

        Student {
            id: self.id,
            user_id: self.user_id,
            student_code: self.student_code,
            full_name: self.full_name,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            email: self.email,
            phone: self.phone,
            address: self.address,
            class_id: self.class_id,
            batch_id: self.batch_id,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Studying),
            enrolled_at: self.enrolled_at,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
