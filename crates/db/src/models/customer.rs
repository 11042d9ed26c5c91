use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::customer, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Customer {
    pub id: Uuid,
    pub org_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    fn from_model(model: customer::Model, org_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            org_id,
            email: model.email,
            name: model.name,
            company: model.company,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(None);
        };
        let record = customer::Entity::find()
            .filter(customer::Column::OrgId.eq(org_row_id))
            .filter(customer::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(|model| Self::from_model(model, org_id)))
    }

    /// Finds the organization's customer with this email, creating it on first
    /// contact. A non-blank `name` replaces the stored one.
    pub async fn upsert_by_email<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        email: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let org_row_id = ids::organization_id_by_uuid(db, org_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;
        let email = email.trim().to_lowercase();
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let existing = customer::Entity::find()
            .filter(customer::Column::OrgId.eq(org_row_id))
            .filter(customer::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;

        let model = match existing {
            Some(record) if name.is_some() && record.name.as_deref() != name => {
                let mut active: customer::ActiveModel = record.into();
                active.name = Set(name.map(str::to_string));
                active.updated_at = Set(now.into());
                active.update(db).await?
            }
            Some(record) => record,
            None => {
                let active = customer::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    org_id: Set(org_row_id),
                    email: Set(email),
                    name: Set(name.map(str::to_string)),
                    company: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                };
                active.insert(db).await?
            }
        };
        Ok(Self::from_model(model, org_id))
    }
}
