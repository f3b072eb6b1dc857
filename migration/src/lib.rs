pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_tables;
mod m20260302_000001_create_schedules;
mod m20260303_000001_create_revoked_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_tables::Migration),
            Box::new(m20260302_000001_create_schedules::Migration),
            Box::new(m20260303_000001_create_revoked_tokens::Migration),
        ]
    }
}
