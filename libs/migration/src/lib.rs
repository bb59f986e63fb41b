pub use sea_orm_migration::prelude::*;

mod m20241001_000000_create_categories;
mod m20241001_000001_create_products;
mod m20241001_000002_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000000_create_categories::Migration),
            Box::new(m20241001_000001_create_products::Migration),
            Box::new(m20241001_000002_seed_catalog::Migration),
        ]
    }
}
