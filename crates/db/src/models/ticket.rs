use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr, ExprTrait, Func, LikeExpr, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::{TicketChannel, TicketPriority, TicketStatus};
use crate::{
    entities::{activity, message, ticket, ticket_tag},
    models::{ids, tag::Tag},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Ticket {
    pub id: Uuid,
    pub org_id: Uuid,
    pub number: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub channel: TicketChannel,
    pub assignee_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub sla_policy_id: Option<Uuid>,
    pub first_response_due: Option<DateTime<Utc>>,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub first_response_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub snooze_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully resolved values for a ticket row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewTicketRecord {
    pub id: Uuid,
    pub org_id: Uuid,
    pub number: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub channel: TicketChannel,
    pub assignee_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub sla_policy_id: Option<Uuid>,
    pub first_response_due: Option<DateTime<Utc>>,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Field patch applied by [`Ticket::save`]. `None` leaves a column untouched;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assignee_id: Option<Option<Uuid>>,
    pub sla_policy_id: Option<Option<Uuid>>,
    pub first_response_due: Option<Option<DateTime<Utc>>>,
    pub sla_deadline: Option<Option<DateTime<Utc>>>,
    pub first_response_at: Option<Option<DateTime<Utc>>>,
    pub resolved_at: Option<Option<DateTime<Utc>>>,
    pub snooze_until: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub enum AssigneeFilter {
    Member(Uuid),
    Unassigned,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct TicketFilters {
    pub statuses: Vec<TicketStatus>,
    pub priorities: Vec<TicketPriority>,
    pub channels: Vec<TicketChannel>,
    pub assignee: Option<AssigneeFilter>,
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sla_breached: Option<bool>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum TicketSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
    Number,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
pub struct TicketSort {
    pub field: TicketSortField,
    pub direction: SortDirection,
}

/// `%text%` with LIKE wildcards escaped by `\`. Only ASCII is folded since
/// SQLite's `LOWER()` leaves other characters alone.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch.to_ascii_lowercase());
    }
    pattern.push('%');
    pattern
}

/// `CASE` expression ranking a text enum column by declaration order.
fn rank_sql(column: &str, values: impl IntoIterator<Item = String>) -> String {
    let arms: String = values
        .into_iter()
        .enumerate()
        .map(|(rank, value)| format!(" WHEN '{value}' THEN {rank}"))
        .collect();
    format!("CASE \"tickets\".\"{column}\"{arms} END")
}

impl Ticket {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: ticket::Model,
        org_id: Uuid,
    ) -> Result<Self, DbErr> {
        let customer_id = match model.customer_id {
            Some(id) => ids::customer_uuid_by_id(db, id).await?,
            None => None,
        };
        let sla_policy_id = match model.sla_policy_id {
            Some(id) => ids::sla_policy_uuid_by_id(db, id).await?,
            None => None,
        };

        Ok(Self {
            id: model.uuid,
            org_id,
            number: model.number,
            title: model.title,
            description: model.description,
            status: model.status,
            priority: model.priority,
            channel: model.channel,
            assignee_id: model.assignee_id,
            customer_id,
            sla_policy_id,
            first_response_due: model.first_response_due.map(Into::into),
            sla_deadline: model.sla_deadline.map(Into::into),
            first_response_at: model.first_response_at.map(Into::into),
            resolved_at: model.resolved_at.map(Into::into),
            snooze_until: model.snooze_until.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    async fn find_model<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ticket::Model>, DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok(None);
        };
        ticket::Entity::find()
            .filter(ticket::Column::OrgId.eq(org_row_id))
            .filter(ticket::Column::Uuid.eq(id))
            .one(db)
            .await
    }

    /// Looks a ticket up by id, only if it belongs to `org_id`.
    pub async fn find_in_org<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        match Self::find_model(db, org_id, id).await? {
            Some(model) => Ok(Some(Self::from_model(db, model, org_id).await?)),
            None => Ok(None),
        }
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &NewTicketRecord,
    ) -> Result<Self, DbErr> {
        let org_row_id = ids::organization_id_by_uuid(db, data.org_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Organization not found".to_string()))?;
        let customer_id = match data.customer_id {
            Some(id) => ids::customer_id_by_uuid(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("Customer not found".to_string()))
                .map(Some)?,
            None => None,
        };
        let sla_policy_id = match data.sla_policy_id {
            Some(id) => ids::sla_policy_id_by_uuid(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("SLA policy not found".to_string()))
                .map(Some)?,
            None => None,
        };

        let active = ticket::ActiveModel {
            uuid: Set(data.id),
            org_id: Set(org_row_id),
            number: Set(data.number),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            status: Set(data.status),
            priority: Set(data.priority),
            channel: Set(data.channel),
            assignee_id: Set(data.assignee_id),
            customer_id: Set(customer_id),
            sla_policy_id: Set(sla_policy_id),
            first_response_due: Set(data.first_response_due.map(Into::into)),
            sla_deadline: Set(data.sla_deadline.map(Into::into)),
            first_response_at: Set(None),
            resolved_at: Set(None),
            snooze_until: Set(None),
            created_at: Set(data.created_at.into()),
            updated_at: Set(data.created_at.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model, data.org_id).await
    }

    /// Applies `changes` and bumps `updated_at` to `now`.
    pub async fn save<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        id: Uuid,
        changes: &TicketChanges,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let record = Self::find_model(db, org_id, id)
            .await?
            .ok_or(DbErr::RecordNotFound("Ticket not found".to_string()))?;

        let mut active: ticket::ActiveModel = record.into();
        if let Some(title) = changes.title.clone() {
            active.title = Set(title);
        }
        if let Some(description) = changes.description.clone() {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(assignee_id) = changes.assignee_id {
            active.assignee_id = Set(assignee_id);
        }
        if let Some(sla_policy_id) = changes.sla_policy_id {
            let row_id = match sla_policy_id {
                Some(policy_id) => Some(
                    ids::sla_policy_id_by_uuid(db, policy_id)
                        .await?
                        .ok_or(DbErr::RecordNotFound("SLA policy not found".to_string()))?,
                ),
                None => None,
            };
            active.sla_policy_id = Set(row_id);
        }
        if let Some(due) = changes.first_response_due {
            active.first_response_due = Set(due.map(Into::into));
        }
        if let Some(deadline) = changes.sla_deadline {
            active.sla_deadline = Set(deadline.map(Into::into));
        }
        if let Some(first_response_at) = changes.first_response_at {
            active.first_response_at = Set(first_response_at.map(Into::into));
        }
        if let Some(resolved_at) = changes.resolved_at {
            active.resolved_at = Set(resolved_at.map(Into::into));
        }
        if let Some(snooze_until) = changes.snooze_until {
            active.snooze_until = Set(snooze_until.map(Into::into));
        }
        active.updated_at = Set(now.into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated, org_id).await
    }

    /// Removes the ticket together with its messages, history and tag links.
    pub async fn delete<C: ConnectionTrait>(db: &C, org_id: Uuid, id: Uuid) -> Result<u64, DbErr> {
        let Some(record) = Self::find_model(db, org_id, id).await? else {
            return Ok(0);
        };

        ticket_tag::Entity::delete_many()
            .filter(ticket_tag::Column::TicketId.eq(record.id))
            .exec(db)
            .await?;
        message::Entity::delete_many()
            .filter(message::Column::TicketId.eq(record.id))
            .exec(db)
            .await?;
        activity::Entity::delete_many()
            .filter(activity::Column::TicketId.eq(record.id))
            .exec(db)
            .await?;
        let result = ticket::Entity::delete_by_id(record.id).exec(db).await?;
        Ok(result.rows_affected)
    }

    fn filter_condition(org_row_id: i64, filters: &TicketFilters, now: DateTime<Utc>) -> Condition {
        let mut condition = Condition::all().add(ticket::Column::OrgId.eq(org_row_id));

        if !filters.statuses.is_empty() {
            condition = condition.add(ticket::Column::Status.is_in(filters.statuses.clone()));
        }
        if !filters.priorities.is_empty() {
            condition = condition.add(ticket::Column::Priority.is_in(filters.priorities.clone()));
        }
        if !filters.channels.is_empty() {
            condition = condition.add(ticket::Column::Channel.is_in(filters.channels.clone()));
        }
        match filters.assignee {
            Some(AssigneeFilter::Member(user_id)) => {
                condition = condition.add(ticket::Column::AssigneeId.eq(user_id));
            }
            Some(AssigneeFilter::Unassigned) => {
                condition = condition.add(ticket::Column::AssigneeId.is_null());
            }
            None => {}
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            let mut any = Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((ticket::Entity, ticket::Column::Title))))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        ticket::Entity,
                        ticket::Column::Description,
                    ))))
                    .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                );
            if let Ok(number) = search.parse::<i32>() {
                any = any.add(ticket::Column::Number.eq(number));
            }
            condition = condition.add(any);
        }
        if !filters.tags.is_empty() {
            condition =
                condition.add(ticket::Column::Id.in_subquery(Tag::tickets_with_any(&filters.tags)));
        }
        if let Some(from) = filters.date_from {
            condition = condition.add(ticket::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filters.date_to {
            condition = condition.add(ticket::Column::CreatedAt.lte(to));
        }
        let resolved = [TicketStatus::Resolved, TicketStatus::Closed];
        match filters.sla_breached {
            Some(true) => {
                condition = condition
                    .add(ticket::Column::SlaDeadline.lt(now))
                    .add(ticket::Column::Status.is_not_in(resolved));
            }
            Some(false) => {
                condition = condition.add(
                    Condition::any()
                        .add(ticket::Column::SlaDeadline.is_null())
                        .add(ticket::Column::SlaDeadline.gte(now))
                        .add(ticket::Column::Status.is_in(resolved)),
                );
            }
            None => {}
        }

        condition
    }

    /// One page of the organization's tickets plus the total match count.
    pub async fn query<C: ConnectionTrait>(
        db: &C,
        org_id: Uuid,
        filters: &TicketFilters,
        sort: TicketSort,
        offset: u64,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Self>, u64), DbErr> {
        let Some(org_row_id) = ids::organization_id_by_uuid(db, org_id).await? else {
            return Ok((Vec::new(), 0));
        };

        let select = ticket::Entity::find().filter(Self::filter_condition(org_row_id, filters, now));
        let total = select.clone().count(db).await?;
        // Offsets past the last row would be empty anyway, and may not fit in an i64.
        if offset >= total {
            return Ok((Vec::new(), total));
        }

        let order: Order = sort.direction.into();
        let ordered = match sort.field {
            TicketSortField::CreatedAt => select.order_by(ticket::Column::CreatedAt, order.clone()),
            TicketSortField::UpdatedAt => select.order_by(ticket::Column::UpdatedAt, order.clone()),
            TicketSortField::Number => select.order_by(ticket::Column::Number, order.clone()),
            TicketSortField::Priority => select.order_by(
                Expr::cust(rank_sql(
                    "priority",
                    TicketPriority::ALL.iter().map(ToString::to_string),
                )),
                order.clone(),
            ),
            TicketSortField::Status => select.order_by(
                Expr::cust(rank_sql(
                    "status",
                    TicketStatus::ALL.iter().map(ToString::to_string),
                )),
                order.clone(),
            ),
        };

        let models = ordered
            .order_by(ticket::Column::Id, order)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;

        let mut tickets = Vec::with_capacity(models.len());
        for model in models {
            tickets.push(Self::from_model(db, model, org_id).await?);
        }
        Ok((tickets, total))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::organization::Organization;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn record(org_id: Uuid, number: i32, title: &str, at: DateTime<Utc>) -> NewTicketRecord {
        NewTicketRecord {
            id: Uuid::new_v4(),
            org_id,
            number,
            title: title.to_string(),
            description: None,
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            channel: TicketChannel::Email,
            assignee_id: None,
            customer_id: None,
            sla_policy_id: None,
            first_response_due: None,
            sla_deadline: None,
            created_at: at,
        }
    }

    #[test]
    fn rank_sql_lists_values_in_order() {
        let sql = rank_sql("priority", TicketPriority::ALL.iter().map(ToString::to_string));
        assert_eq!(
            sql,
            "CASE \"tickets\".\"priority\" WHEN 'URGENT' THEN 0 WHEN 'HIGH' THEN 1 \
             WHEN 'MEDIUM' THEN 2 WHEN 'LOW' THEN 3 END"
        );
    }

    #[tokio::test]
    async fn find_in_org_hides_other_tenants() {
        let db = setup_db().await;
        let now = Utc::now();
        let acme = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", now)
            .await
            .unwrap();
        let globex = Organization::create(&db, Uuid::new_v4(), "Globex", "globex", now)
            .await
            .unwrap();
        let ticket = Ticket::create(&db, &record(acme.id, 1, "Printer on fire", now))
            .await
            .unwrap();

        assert!(Ticket::find_in_org(&db, acme.id, ticket.id).await.unwrap().is_some());
        assert!(Ticket::find_in_org(&db, globex.id, ticket.id).await.unwrap().is_none());
        assert_eq!(Ticket::delete(&db, globex.id, ticket.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_patches_only_given_fields() {
        let db = setup_db().await;
        let created = Utc::now() - Duration::hours(1);
        let org = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", created)
            .await
            .unwrap();
        let mut new = record(org.id, 1, "VPN down", created);
        new.description = Some("since this morning".to_string());
        let ticket = Ticket::create(&db, &new).await.unwrap();

        let now = Utc::now();
        let saved = Ticket::save(
            &db,
            org.id,
            ticket.id,
            &TicketChanges {
                status: Some(TicketStatus::Resolved),
                resolved_at: Some(Some(now)),
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();

        assert_eq!(saved.status, TicketStatus::Resolved);
        assert_eq!(saved.resolved_at, Some(now));
        assert_eq!(saved.description.as_deref(), Some("since this morning"));
        assert_eq!(saved.created_at, ticket.created_at);
        assert_eq!(saved.updated_at, now);
    }

    #[tokio::test]
    async fn query_sorts_priority_by_rank_and_pages() {
        let db = setup_db().await;
        let now = Utc::now();
        let org = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", now)
            .await
            .unwrap();
        for (number, priority) in [
            (1, TicketPriority::Low),
            (2, TicketPriority::Urgent),
            (3, TicketPriority::Medium),
            (4, TicketPriority::High),
        ] {
            let mut new = record(org.id, number, &format!("ticket {number}"), now);
            new.priority = priority;
            Ticket::create(&db, &new).await.unwrap();
        }

        let sort = TicketSort {
            field: TicketSortField::Priority,
            direction: SortDirection::Asc,
        };
        let (items, total) =
            Ticket::query(&db, org.id, &TicketFilters::default(), sort, 0, 3, now)
                .await
                .unwrap();
        assert_eq!(total, 4);
        let priorities: Vec<_> = items.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![TicketPriority::Urgent, TicketPriority::High, TicketPriority::Medium]
        );

        let (rest, total) =
            Ticket::query(&db, org.id, &TicketFilters::default(), sort, 3, 3, now)
                .await
                .unwrap();
        assert_eq!(total, 4);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].priority, TicketPriority::Low);

        for offset in [4, u64::MAX] {
            let (past_end, total) =
                Ticket::query(&db, org.id, &TicketFilters::default(), sort, offset, 3, now)
                    .await
                    .unwrap();
            assert_eq!(total, 4);
            assert!(past_end.is_empty());
        }
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Snake_Case"), "%snake\\_case%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(contains_pattern("Émile"), "%Émile%");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let db = setup_db().await;
        let now = Utc::now();
        let org = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", now)
            .await
            .unwrap();
        Ticket::create(&db, &record(org.id, 1, "Login broken", now)).await.unwrap();
        let snake = Ticket::create(&db, &record(org.id, 2, "snake_case bug", now))
            .await
            .unwrap();
        Ticket::create(&db, &record(org.id, 3, "1005 errors", now)).await.unwrap();
        let percent = Ticket::create(&db, &record(org.id, 4, "CPU at 100%", now))
            .await
            .unwrap();
        let accented = Ticket::create(&db, &record(org.id, 5, "Émile cannot log in", now))
            .await
            .unwrap();

        for (search, expected) in [("_", snake.id), ("100%", percent.id), ("Émile", accented.id)] {
            let filters = TicketFilters {
                search: Some(search.to_string()),
                ..Default::default()
            };
            let (items, total) =
                Ticket::query(&db, org.id, &filters, TicketSort::default(), 0, 20, now)
                    .await
                    .unwrap();
            assert_eq!(total, 1, "search {search}");
            assert_eq!(items[0].id, expected, "search {search}");
        }
    }

    #[tokio::test]
    async fn search_matches_text_case_insensitively_or_exact_number() {
        let db = setup_db().await;
        let now = Utc::now();
        let org = Organization::create(&db, Uuid::new_v4(), "Acme", "acme", now)
            .await
            .unwrap();
        Ticket::create(&db, &record(org.id, 12, "Login broken", now)).await.unwrap();
        let mut described = record(org.id, 120, "Other", now);
        described.description = Some("user cannot LOGIN on mobile".to_string());
        Ticket::create(&db, &described).await.unwrap();

        let by_text = TicketFilters {
            search: Some("login".to_string()),
            ..Default::default()
        };
        let (items, total) =
            Ticket::query(&db, org.id, &by_text, TicketSort::default(), 0, 20, now)
                .await
                .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 2);

        let by_number = TicketFilters {
            search: Some(" 12 ".to_string()),
            ..Default::default()
        };
        let (items, _) =
            Ticket::query(&db, org.id, &by_number, TicketSort::default(), 0, 20, now)
                .await
                .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].number, 12);
    }
}
