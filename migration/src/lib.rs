pub use sea_orm_migration::prelude::*;

mod m2025_10_20_000001_create_users;
mod m2025_10_20_000002_create_predictions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        // users must exist before predictions references it
        vec![
            Box::new(m2025_10_20_000001_create_users::Migration),
            Box::new(m2025_10_20_000002_create_predictions::Migration),
        ]
    }
}
