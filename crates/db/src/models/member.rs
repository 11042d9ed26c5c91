use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::MemberRole;
use crate::{entities::member, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Member {
    pub id: Uuid,
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
}

impl Member {
    fn from_model(model: member::Model, org_id: Uuid) -> Self {
        Self {
            id: model.uuid,
            org_id,
            user_id: model.user_id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at.into(),
        }
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        data: &CreateMember,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let org_row_id = ids::organization_id_by_uuid(db, org_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;
        let active = member::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            org_id: Set(org_row_id),
            user_id: Set(data.user_id),
            name: Set(data.name.clone()),
            email: Set(data.email.clone()),
            role: Set(data.role),
            created_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, org_id))
    }

    pub async fn find_by_user<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(None);
        };
        let record = member::Entity::find()
            .filter(member::Column::OrgId.eq(org_row_id))
            .filter(member::Column::UserId.eq(user_id))
            .one(db)
            .await?;
        Ok(record.map(|model| Self::from_model(model, org_id)))
    }

    pub async fn list_for_org<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(Vec::new());
        };
        let records = member::Entity::find()
            .filter(member::Column::OrgId.eq(org_row_id))
            .order_by_asc(member::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records
            .into_iter()
            .map(|model| Self::from_model(model, org_id))
            .collect())
    }
}
