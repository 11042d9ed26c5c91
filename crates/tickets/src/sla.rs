//! SLA policy defaults, deadline derivation and the compliance signal shown
//! next to every ticket.

use chrono::{DateTime, Duration, Utc};
use db::{
    ConnectionTrait,
    models::sla_policy::{CreateSlaPolicy, SlaPolicy},
    types::TicketPriority,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{Result, TicketError};

/// Reference window behind the progress percentage. It is fixed and does not
/// follow the bound policy's resolution time.
pub const BASELINE_WINDOW_MIN: i64 = 240;
const WARNING_THRESHOLD_MIN: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlaStatus {
    Ok,
    Warning,
    Breached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SlaSnapshot {
    pub status: SlaStatus,
    pub text: String,
    pub percentage: f64,
}

/// Classifies a deadline relative to `now`. Recomputed on every read.
pub fn classify_sla(now: DateTime<Utc>, deadline: Option<DateTime<Utc>>) -> SlaSnapshot {
    let Some(deadline) = deadline else {
        return SlaSnapshot {
            status: SlaStatus::Ok,
            text: "No SLA".to_string(),
            percentage: 0.0,
        };
    };

    let remaining_min = (deadline - now).num_milliseconds().div_euclid(60_000);
    if remaining_min <= 0 {
        return SlaSnapshot {
            status: SlaStatus::Breached,
            text: format!("Breached {}m ago", remaining_min.abs()),
            percentage: 100.0,
        };
    }

    let elapsed = (BASELINE_WINDOW_MIN - remaining_min) as f64;
    let percentage = (elapsed / BASELINE_WINDOW_MIN as f64 * 100.0).clamp(0.0, 100.0);

    if remaining_min < WARNING_THRESHOLD_MIN {
        SlaSnapshot {
            status: SlaStatus::Warning,
            text: format!("{remaining_min}m left"),
            percentage,
        }
    } else {
        SlaSnapshot {
            status: SlaStatus::Ok,
            text: format!("{}h {}m left", remaining_min / 60, remaining_min % 60),
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaDeadlines {
    pub first_response_due: DateTime<Utc>,
    pub resolution_due: DateTime<Utc>,
}

/// Turns a bound policy and the ticket's creation time into due dates.
pub trait DeadlineStrategy: Send + Sync {
    fn deadlines(&self, policy: &SlaPolicy, created_at: DateTime<Utc>) -> SlaDeadlines;
}

/// Counts every minute. `business_hours_only` is carried on the policy but
/// not applied here.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClockDeadlines;

impl DeadlineStrategy for WallClockDeadlines {
    fn deadlines(&self, policy: &SlaPolicy, created_at: DateTime<Utc>) -> SlaDeadlines {
        SlaDeadlines {
            first_response_due: created_at
                + Duration::minutes(i64::from(policy.first_response_min)),
            resolution_due: created_at + Duration::minutes(i64::from(policy.resolution_min)),
        }
    }
}

/// Policies every new organization starts with.
pub const DEFAULT_POLICIES: [(&str, TicketPriority, i32, i32, bool); 4] = [
    ("Urgent SLA", TicketPriority::Urgent, 30, 240, false),
    ("High SLA", TicketPriority::High, 60, 480, true),
    ("Medium SLA", TicketPriority::Medium, 240, 1440, true),
    ("Low SLA", TicketPriority::Low, 480, 2880, true),
];

pub fn default_policies() -> Vec<CreateSlaPolicy> {
    DEFAULT_POLICIES
        .iter()
        .map(
            |&(name, priority, first_response_min, resolution_min, business_hours_only)| {
                CreateSlaPolicy {
                    name: name.to_string(),
                    priority,
                    first_response_min,
                    resolution_min,
                    business_hours_only,
                }
            },
        )
        .collect()
}

/// The organization's policy for `priority`.
pub async fn resolve_policy<C: ConnectionTrait>(
    db: &C,
    org_id: Uuid,
    priority: TicketPriority,
) -> Result<SlaPolicy> {
    SlaPolicy::find_for_priority(db, org_id, priority)
        .await?
        .ok_or_else(|| TicketError::NotFound(format!("No SLA policy for {priority} priority")))
}
