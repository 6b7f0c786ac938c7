pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_packages_table;
mod m20240101_000003_create_members_table;
mod m20240101_000004_create_trainers_table;
mod m20240101_000005_create_payments_table;
mod m20240101_000006_create_attendance_table;
mod m20240101_000007_create_gym_settings_table;
mod m20240101_000008_insert_default_admin_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_packages_table::Migration),
            Box::new(m20240101_000003_create_members_table::Migration),
            Box::new(m20240101_000004_create_trainers_table::Migration),
            Box::new(m20240101_000005_create_payments_table::Migration),
            Box::new(m20240101_000006_create_attendance_table::Migration),
            Box::new(m20240101_000007_create_gym_settings_table::Migration),
            Box::new(m20240101_000008_insert_default_admin_data::Migration),
        ]
    }
}
