//! Activity kinds recorded in a ticket's history and their JSON payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{TicketPriority, TicketStatus};

pub const ACTIVITY_TICKET_CREATED: &str = "ticket_created";
pub const ACTIVITY_STATUS_CHANGED: &str = "status_changed";
pub const ACTIVITY_PRIORITY_CHANGED: &str = "priority_changed";
pub const ACTIVITY_ASSIGNEE_CHANGED: &str = "assignee_changed";
pub const ACTIVITY_SNOOZED: &str = "snoozed";
pub const ACTIVITY_UNSNOOZED: &str = "unsnoozed";
pub const ACTIVITY_TAGS_CHANGED: &str = "tags_changed";
pub const ACTIVITY_TITLE_CHANGED: &str = "title_changed";
pub const ACTIVITY_DESCRIPTION_CHANGED: &str = "description_changed";
pub const ACTIVITY_REPLY_SENT: &str = "reply_sent";
pub const ACTIVITY_NOTE_ADDED: &str = "note_added";
pub const ACTIVITY_SLA_POLICY_CHANGED: &str = "sla_policy_changed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreatedPayload {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangedPayload {
    pub from: TicketStatus,
    pub to: TicketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityChangedPayload {
    pub from: TicketPriority,
    pub to: TicketPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeChangedPayload {
    pub from: Option<Uuid>,
    pub to: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnoozePayload {
    pub until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsChangedPayload {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleChangedPayload {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaPolicyChangedPayload {
    pub from: Option<Uuid>,
    pub to: Uuid,
    pub priority: TicketPriority,
}
