use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::MessageType;
use crate::{entities::message, models::ids};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Message {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Option<Uuid>,
    pub message_type: MessageType,
    pub body: String,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMessage {
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    fn from_model(model: message::Model, ticket_id: Uuid) -> Self {
        let attachments = serde_json::from_value(model.attachments).unwrap_or_else(|err| {
            tracing::warn!(message_id = %model.uuid, error = %err, "Unreadable attachments");
            Vec::new()
        });
        Self {
            id: model.uuid,
            ticket_id,
            author_id: model.author_id,
            message_type: model.message_type,
            body: model.body,
            attachments,
            created_at: model.created_at.into(),
        }
    }

    pub async fn append<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
        author_id: Option<Uuid>,
        data: &CreateMessage,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let ticket_row_id = ids::ticket_id_by_uuid(db, ticket_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Ticket not found".to_string()))?;
        let attachments = serde_json::to_value(&data.attachments)
            .map_err(|err| DbErr::Custom(format!("Invalid attachments: {err}")))?;

        let active = message::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            ticket_id: Set(ticket_row_id),
            author_id: Set(author_id),
            message_type: Set(data.message_type),
            body: Set(data.body.clone()),
            attachments: Set(attachments),
            created_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, ticket_id))
    }

    /// Messages of a ticket in conversation order.
    pub async fn list_for_ticket<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(ticket_row_id) = ids::ticket_id_by_uuid(db, ticket_id).await? else {
            return Ok(Vec::new());
        };
        let records = message::Entity::find()
            .filter(message::Column::TicketId.eq(ticket_row_id))
            .order_by_asc(message::Column::CreatedAt)
            .order_by_asc(message::Column::Id)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|model| Self::from_model(model, ticket_id))
            .collect())
    }
}
