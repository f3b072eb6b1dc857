//! 教学大纲实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "curricula")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub batch_id: Option<i64>,
    pub grade: i32,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::curriculum_subjects::Entity")]
    CurriculumSubjects,
}

impl Related<super::curriculum_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurriculumSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 科目行需单独查询后传入
    pub fn into_curriculum(
        self,
        subjects: Vec<super::curriculum_subjects::Model>,
    ) -> crate::models::curricula::entities::Curriculum {
        use crate::models::curricula::entities::{Curriculum, CurriculumSubject};

        Curriculum {
            id: self.id,
            name: self.name,
            batch_id: self.batch_id,
            grade: self.grade,
            description: self.description,
            subjects: subjects
                .into_iter()
                .map(|line| CurriculumSubject {
                    subject_id: line.subject_id,
                    sessions_per_week: line.sessions_per_week,
                })
                .collect(),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
