use sea_orm::JsonValue;
use sea_orm::entity::prelude::*;

use crate::types::MessageType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub ticket_id: i64,
    pub author_id: Option<Uuid>,
    pub message_type: MessageType,
    pub body: String,
    pub attachments: JsonValue,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
