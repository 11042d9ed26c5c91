use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::organization, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    fn from_model(model: organization::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            slug: model.slug,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    pub async fn slug_exists<C: ConnectionTrait>(db: &C, slug: &str) -> Result<bool, DbErr> {
        let found: Option<i64> = organization::Entity::find()
            .select_only()
            .column(organization::Column::Id)
            .filter(organization::Column::Slug.eq(slug))
            .into_tuple()
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        name: &str,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let active = organization::ActiveModel {
            uuid: Set(id),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            next_ticket_number: Set(1),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Hands out the next display number for a ticket in this organization.
    ///
    /// The increment is a single `UPDATE`, so callers inside a transaction hold
    /// the row until commit and concurrent creators never observe the same value.
    pub async fn allocate_ticket_number<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<i32, DbErr> {
        let org_row_id = ids::organization_id_by_uuid(db, id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;

        let result = organization::Entity::update_many()
            .col_expr(
                organization::Column::NextTicketNumber,
                Expr::col(organization::Column::NextTicketNumber).add(1),
            )
            .filter(organization::Column::Id.eq(org_row_id))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound("Organization not found".to_string()));
        }

        let next: i32 = organization::Entity::find()
            .select_only()
            .column(organization::Column::NextTicketNumber)
            .filter(organization::Column::Id.eq(org_row_id))
            .into_tuple()
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;
        Ok(next - 1)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn ticket_numbers_are_sequential_per_org() {
        let db = setup_db().await;
        let now = Utc::now();
        let acme = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", now)
            .await
            .unwrap();
        let globex = Organization::create(&db, Uuid::new_v4(), "Globex", "globex", now)
            .await
            .unwrap();

        assert_eq!(Organization::allocate_ticket_number(&db, acme.id).await.unwrap(), 1);
        assert_eq!(Organization::allocate_ticket_number(&db, acme.id).await.unwrap(), 2);
        assert_eq!(Organization::allocate_ticket_number(&db, globex.id).await.unwrap(), 1);
        assert_eq!(Organization::allocate_ticket_number(&db, acme.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn slug_lookup_and_missing_org() {
        let db = setup_db().await;
        Organization::create(&db, Uuid::new_v4(), "Acme", "acme", Utc::now())
            .await
            .unwrap();

        assert!(Organization::slug_exists(&db, "acme").await.unwrap());
        assert!(!Organization::slug_exists(&db, "acme-2").await.unwrap());

        let err = Organization::allocate_ticket_number(&db, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }
}
