use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_profiles_table;
mod m20240101_000003_create_work_experiences_table;
mod m20240101_000004_create_notification_events_table;
mod m20240101_000005_create_user_notification_preferences_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_profiles_table::Migration),
            Box::new(m20240101_000003_create_work_experiences_table::Migration),
            Box::new(m20240101_000004_create_notification_events_table::Migration),
            Box::new(m20240101_000005_create_user_notification_preferences_table::Migration),
        ]
    }
}
