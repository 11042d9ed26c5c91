use chrono::{DateTime, Utc};
use db::types::{TicketChannel, TicketPriority};
use serde::{Deserialize, Deserializer};
use ts_rs::TS;
use uuid::Uuid;

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`) in patch bodies.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct CreateTicket {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub channel: TicketChannel,
    #[serde(default, alias = "assigneeId")]
    pub assignee_id: Option<Uuid>,
    #[serde(default, alias = "customerId")]
    pub customer_id: Option<Uuid>,
    #[serde(default, alias = "customerEmail")]
    pub customer_email: Option<String>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial ticket update. Nullable fields accept `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct UpdateTicket {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub description: Option<Option<String>>,
    /// Parsed by the engine so unknown values surface as `InvalidStatus`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default, alias = "assigneeId", deserialize_with = "double_option")]
    #[ts(optional)]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, alias = "snoozeUntil", deserialize_with = "double_option")]
    #[ts(optional)]
    pub snooze_until: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_absent_are_different() {
        let patch: UpdateTicket =
            serde_json::from_str(r#"{"assigneeId": null, "title": "Printer on fire"}"#).unwrap();
        assert_eq!(patch.assignee_id, Some(None));
        assert_eq!(patch.description, None);
        assert_eq!(patch.title.as_deref(), Some("Printer on fire"));

        let patch: UpdateTicket = serde_json::from_str(r#"{"description": "details"}"#).unwrap();
        assert_eq!(patch.description, Some(Some("details".to_string())));
        assert_eq!(patch.assignee_id, None);
    }

    #[test]
    fn create_accepts_camel_case_aliases() {
        let create: CreateTicket = serde_json::from_str(
            r#"{"title": "Login fails", "priority": "HIGH", "customerEmail": "ann@example.com"}"#,
        )
        .unwrap();
        assert_eq!(create.priority, TicketPriority::High);
        assert_eq!(create.channel, TicketChannel::Email);
        assert_eq!(create.customer_email.as_deref(), Some("ann@example.com"));
        assert!(create.tags.is_empty());
    }
}
