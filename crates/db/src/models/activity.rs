use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::activity, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Activity {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub kind: String,
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// An entry to append to a ticket's history.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub ticket_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub kind: &'static str,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl NewActivity {
    pub fn new<P: Serialize>(
        ticket_id: Uuid,
        actor_id: Option<Uuid>,
        kind: &'static str,
        payload: &P,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_id,
            actor_id,
            kind,
            data: serde_json::to_value(payload).unwrap_or_default(),
            created_at,
        }
    }
}

impl Activity {
    fn from_model(model: activity::Model, ticket_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            ticket_id,
            actor_id: model.actor_id,
            kind: model.kind,
            data: model.data,
            created_at: model.created_at.into(),
        }
    }

    pub async fn append<C: ConnectionTrait>(db: &C, entry: &NewActivity) -> Result<Self, DbErr> {
        let ticket_row_id = ids::ticket_id_by_uuid(db, entry.ticket_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Ticket not found".to_string()))?;
        let active = activity::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            ticket_id: Set(ticket_row_id),
            actor_id: Set(entry.actor_id),
            kind: Set(entry.kind.to_string()),
            data: Set(entry.data.clone()),
            created_at: Set(entry.created_at.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, entry.ticket_id))
    }

    /// History of a ticket, newest first.
    pub async fn list_for_ticket<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(ticket_row_id) = ids::ticket_id_by_uuid(db, ticket_id).await? else {
            return Ok(Vec::new());
        };
        let records = activity::Entity::find()
            .filter(activity::Column::TicketId.eq(ticket_row_id))
            .order_by_desc(activity::Column::CreatedAt)
            .order_by_desc(activity::Column::Id)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|model| Self::from_model(model, ticket_id))
            .collect())
    }
}
