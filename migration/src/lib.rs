pub use sea_orm_migration::prelude::*;

pub mod backup;
mod m20240301_000001_create_games;
mod m20240301_000002_create_reviews;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_games::Migration),
            Box::new(m20240301_000002_create_reviews::Migration),
        ]
    }
}
