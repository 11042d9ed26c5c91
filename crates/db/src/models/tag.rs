use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, JoinType, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::{tag, ticket_tag},
    models::ids,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

/// Trims, drops blanks and removes duplicates while keeping first-seen order.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        let trimmed = name.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s: &String| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

impl Tag {
    fn from_model(model: tag::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            color: model.color,
        }
    }

    pub async fn for_ticket<C: ConnectionTrait>(
        db: &C,
        ticket_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(ticket_row_id) = ids::ticket_id_by_uuid(db, ticket_id).await? else {
            return Ok(Vec::new());
        };
        let tag_ids = Query::select()
            .column((ticket_tag::Entity, ticket_tag::Column::TagId))
            .from(ticket_tag::Entity)
            .and_where(Expr::col((ticket_tag::Entity, ticket_tag::Column::TicketId)).eq(ticket_row_id))
            .to_owned();
        let records = tag::Entity::find()
            .filter(tag::Column::Id.in_subquery(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Replaces the ticket's tag set, creating organization tags on first use.
    pub async fn set_for_ticket<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        ticket_id: Uuid,
        names: &[String],
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, DbErr> {
        let org_row_id = ids::organization_id_by_uuid(db, org_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;
        let ticket_row_id = ids::ticket_id_by_uuid(db, ticket_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Ticket not found".to_string()))?;
        let names = normalize_tag_names(names);

        let existing: HashMap<String, tag::Model> = tag::Entity::find()
            .filter(tag::Column::OrgId.eq(org_row_id))
            .filter(tag::Column::Name.is_in(names.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.name.clone(), model))
            .collect();

        let mut models = Vec::with_capacity(names.len());
        for name in &names {
            let model = match existing.get(name) {
                Some(model) => model.clone(),
                None => {
                    tag::ActiveModel {
                        uuid: Set(Uuid::new_v4()),
                        org_id: Set(org_row_id),
                        name: Set(name.clone()),
                        color: Set(None),
                        created_at: Set(now.into()),
                        ..Default::default()
                    }
                    .insert(db)
                    .await?
                }
            };
            models.push(model);
        }

        ticket_tag::Entity::delete_many()
            .filter(ticket_tag::Column::TicketId.eq(ticket_row_id))
            .exec(db)
            .await?;
        for model in &models {
            ticket_tag::ActiveModel {
                ticket_id: Set(ticket_row_id),
                tag_id: Set(model.id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        Ok(models.into_iter().map(Self::from_model).collect())
    }

    /// Ticket row ids carrying any of the given tag names.
    pub(crate) fn tickets_with_any(names: &[String]) -> SelectStatement {
        Query::select()
            .column((ticket_tag::Entity, ticket_tag::Column::TicketId))
            .from(ticket_tag::Entity)
            .join(
                JoinType::InnerJoin,
                tag::Entity,
                Expr::col((tag::Entity, tag::Column::Id))
                    .equals((ticket_tag::Entity, ticket_tag::Column::TagId)),
            )
            .and_where(Expr::col((tag::Entity, tag::Column::Name)).is_in(names.to_vec()))
            .to_owned()
    }
}
