pub mod health;
pub mod members;
pub mod organizations;
pub mod sla_policies;
pub mod tickets;
