pub mod activity;
pub mod customer;
pub mod member;
pub mod message;
pub mod organization;
pub mod sla_policy;
pub mod tag;
pub mod ticket;
pub mod ticket_tag;
