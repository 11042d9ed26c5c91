use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Pending,
        TicketStatus::OnHold,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// RESOLVED and CLOSED both count as resolved for SLA and `resolved_at`.
    pub fn is_resolved(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    pub fn rank(self) -> i32 {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default() as i32
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    #[sea_orm(string_value = "URGENT")]
    Urgent,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[default]
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Urgent,
        TicketPriority::High,
        TicketPriority::Medium,
        TicketPriority::Low,
    ];

    pub fn rank(self) -> i32 {
        Self::ALL.iter().position(|p| *p == self).unwrap_or_default() as i32
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketChannel {
    #[default]
    #[sea_orm(string_value = "EMAIL")]
    Email,
    #[sea_orm(string_value = "SLACK")]
    Slack,
    #[sea_orm(string_value = "TEAMS")]
    Teams,
    #[sea_orm(string_value = "WHATSAPP")]
    Whatsapp,
    #[sea_orm(string_value = "CHAT")]
    Chat,
    #[sea_orm(string_value = "API")]
    Api,
    #[sea_orm(string_value = "PHONE")]
    Phone,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    #[default]
    #[sea_orm(string_value = "REPLY")]
    Reply,
    #[sea_orm(string_value = "NOTE")]
    Note,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    #[sea_orm(string_value = "OWNER")]
    Owner,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[default]
    #[sea_orm(string_value = "AGENT")]
    Agent,
    #[sea_orm(string_value = "VIEWER")]
    Viewer,
}

impl MemberRole {
    pub fn is_admin(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_parses_wire_strings() {
        assert_eq!(TicketStatus::from_str("IN_PROGRESS").unwrap(), TicketStatus::InProgress);
        assert_eq!(TicketStatus::OnHold.to_string(), "ON_HOLD");
        assert!(TicketStatus::from_str("ARCHIVED").is_err());
        assert!(TicketStatus::from_str("open").is_err());
    }

    #[test]
    fn ranks_follow_declaration_order() {
        assert!(TicketPriority::Urgent.rank() < TicketPriority::Low.rank());
        assert_eq!(TicketStatus::Closed.rank(), 5);
        assert!(TicketStatus::Closed.is_resolved());
        assert!(!TicketStatus::OnHold.is_resolved());
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&TicketChannel::Whatsapp).unwrap();
        assert_eq!(json, "\"WHATSAPP\"");
        let role: MemberRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(role.is_admin());
        assert!(!MemberRole::Agent.is_admin());
    }
}
