//! 教学大纲科目行

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "curriculum_subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub curriculum_id: i64,
    pub subject_id: i64,
    pub sessions_per_week: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::curricula::Entity",
        from = "Column::CurriculumId",
        to = "super::curricula::Column::Id"
    )]
    Curriculum,
}

impl Related<super::curricula::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Curriculum.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
