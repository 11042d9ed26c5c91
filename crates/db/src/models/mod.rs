#![allow(clippy::useless_conversion)]

pub mod activity;
pub mod customer;
pub mod ids;
pub mod member;
pub mod message;
pub mod organization;
pub mod sla_policy;
pub mod tag;
pub mod ticket;
