//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_and_roles;
mod m20240601_000002_create_catalog;
mod m20240601_000003_create_shopping_carts;
mod m20240601_000004_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_and_roles::Migration),
            Box::new(m20240601_000002_create_catalog::Migration),
            Box::new(m20240601_000003_create_shopping_carts::Migration),
            Box::new(m20240601_000004_create_orders::Migration),
        ]
    }
}
