use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::{sla_policy, ticket},
    models::ids,
    types::{TicketPriority, TicketStatus},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SlaPolicy {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub priority: TicketPriority,
    pub first_response_min: i32,
    pub resolution_min: i32,
    pub business_hours_only: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSlaPolicy {
    pub name: String,
    pub priority: TicketPriority,
    pub first_response_min: i32,
    pub resolution_min: i32,
    pub business_hours_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlaPolicy {
    pub name: Option<String>,
    pub first_response_min: Option<i32>,
    pub resolution_min: Option<i32>,
    pub business_hours_only: Option<bool>,
}

impl SlaPolicy {
    fn from_model(model: sla_policy::Model, org_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            org_id,
            name: model.name,
            priority: model.priority,
            first_response_min: model.first_response_min,
            resolution_min: model.resolution_min,
            business_hours_only: model.business_hours_only,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    async fn org_row_id<C: ConnectionTrait>(db: &C, org_id: Uuid) -> Result<i64, DbErr> {
        ids::organization_id_by_uuid(db, org_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))
    }

    async fn find_model<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<sla_policy::Model>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(None);
        };
        sla_policy::Entity::find()
            .filter(sla_policy::Column::OrgId.eq(org_row_id))
            .filter(sla_policy::Column::Uuid.eq(id))
            .one(db)
            .await
    }

    pub async fn find_in_org<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let record = Self::find_model(db, org_id, id).await?;
        Ok(record.map(|model| Self::from_model(model, org_id)))
    }

    pub async fn find_for_priority<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        priority: TicketPriority,
    ) -> Result<Option<Self>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(None);
        };
        let record = sla_policy::Entity::find()
            .filter(sla_policy::Column::OrgId.eq(org_row_id))
            .filter(sla_policy::Column::Priority.eq(priority))
            .one(db)
            .await?;
        Ok(record.map(|model| Self::from_model(model, org_id)))
    }

    /// Policies of the organization, most urgent first.
    pub async fn list_for_org<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(Vec::new());
        };
        let mut policies: Vec<Self> = sla_policy::Entity::find()
            .filter(sla_policy::Column::OrgId.eq(org_row_id))
            .all(db)
            .await?
            .into_iter()
            .map(|model| Self::from_model(model, org_id))
            .collect();
        policies.sort_by_key(|policy| policy.priority.rank());
        Ok(policies)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        data: &CreateSlaPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let org_row_id = Self::org_row_id(db, org_id).await?;
        let active = sla_policy::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            org_id: Set(org_row_id),
            name: Set(data.name.clone()),
            priority: Set(data.priority),
            first_response_min: Set(data.first_response_min),
            resolution_min: Set(data.resolution_min),
            business_hours_only: Set(data.business_hours_only),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, org_id))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
        data: &UpdateSlaPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let record = Self::find_model(db, org_id, id)
            .await?
            .ok_or(DbErr::RecordNotFound("SLA policy not found".to_string()))?;

        let mut active: sla_policy::ActiveModel = record.into();
        if let Some(name) = data.name.clone() {
            active.name = Set(name);
        }
        if let Some(first_response_min) = data.first_response_min {
            active.first_response_min = Set(first_response_min);
        }
        if let Some(resolution_min) = data.resolution_min {
            active.resolution_min = Set(resolution_min);
        }
        if let Some(business_hours_only) = data.business_hours_only {
            active.business_hours_only = Set(business_hours_only);
        }
        active.updated_at = Set(now.into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated, org_id))
    }

    /// Counts tickets that still depend on the policy for their SLA.
    pub async fn count_unresolved_tickets<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(record) = Self::find_model(db, org_id, id).await? else {
            return Ok(0);
        };
        ticket::Entity::find()
            .filter(ticket::Column::SlaPolicyId.eq(record.id))
            .filter(ticket::Column::Status.is_not_in([TicketStatus::Resolved, TicketStatus::Closed]))
            .count(db)
            .await
    }

    /// Deletes the policy and detaches it from any remaining tickets.
    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(record) = Self::find_model(db, org_id, id).await? else {
            return Ok(0);
        };

        ticket::Entity::update_many()
            .col_expr(ticket::Column::SlaPolicyId, Expr::value(None::<i64>))
            .filter(ticket::Column::SlaPolicyId.eq(record.id))
            .exec(db)
            .await?;

        let result = sla_policy::Entity::delete_by_id(record.id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
