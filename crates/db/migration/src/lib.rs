use sea_orm_migration::prelude::*;

mod columns;
mod m20250101000000_baseline;
mod m20250215000000_tickets;
mod m20250220000000_ticket_number_unique;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101000000_baseline::Migration),
            Box::new(m20250215000000_tickets::Migration),
            Box::new(m20250220000000_ticket_number_unique::Migration),
        ]
    }
}
