use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{customer, organization, sla_policy, ticket};

pub async fn organization_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    organization::Entity::find()
        .select_only()
        .column(organization::Column::Id)
        .filter(organization::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn ticket_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    ticket::Entity::find()
        .select_only()
        .column(ticket::Column::Id)
        .filter(ticket::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn customer_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    customer::Entity::find()
        .select_only()
        .column(customer::Column::Id)
        .filter(customer::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn customer_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    customer::Entity::find()
        .select_only()
        .column(customer::Column::Uuid)
        .filter(customer::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn sla_policy_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    sla_policy::Entity::find()
        .select_only()
        .column(sla_policy::Column::Id)
        .filter(sla_policy::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn sla_policy_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    sla_policy::Entity::find()
        .select_only()
        .column(sla_policy::Column::Uuid)
        .filter(sla_policy::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::organization::Organization;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn uuid_resolution_finds_known_rows_only() {
        let db = setup_db().await;

        let org_id = Uuid::new_v4();
        let org = Organization::create(&db, org_id, "Acme", "acme", Utc::now())
            .await
            .unwrap();
        assert_eq!(org.id, org_id);

        assert!(organization_id_by_uuid(&db, org_id).await.unwrap().is_some());
        assert_eq!(organization_id_by_uuid(&db, Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(ticket_id_by_uuid(&db, Uuid::new_v4()).await.unwrap(), None);
    }
}
