use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use config::{LifecycleConfig, ReopenPolicy};
use db::{
    DatabaseTransaction, DbPool, TransactionTrait,
    events::{
        ACTIVITY_ASSIGNEE_CHANGED, ACTIVITY_DESCRIPTION_CHANGED, ACTIVITY_NOTE_ADDED,
        ACTIVITY_PRIORITY_CHANGED, ACTIVITY_REPLY_SENT, ACTIVITY_SLA_POLICY_CHANGED,
        ACTIVITY_SNOOZED, ACTIVITY_STATUS_CHANGED, ACTIVITY_TAGS_CHANGED, ACTIVITY_TICKET_CREATED,
        ACTIVITY_TITLE_CHANGED, ACTIVITY_UNSNOOZED, AssigneeChangedPayload, MessagePayload,
        PriorityChangedPayload, SlaPolicyChangedPayload, SnoozePayload, StatusChangedPayload,
        TagsChangedPayload, TicketCreatedPayload, TitleChangedPayload,
    },
    models::{
        activity::{Activity, NewActivity},
        customer::Customer,
        member::{CreateMember, Member},
        message::{CreateMessage, Message},
        organization::Organization,
        sla_policy::{SlaPolicy, UpdateSlaPolicy},
        tag::{Tag, normalize_tag_names},
        ticket::{NewTicketRecord, Ticket, TicketChanges, TicketFilters, TicketSort},
    },
    retry::retry_on_sqlite_busy,
    types::{MemberRole, MessageType, TicketPriority, TicketStatus},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    actor::Actor,
    clock::{Clock, SystemClock},
    error::{Result, TicketError},
    query::{PageRequest, TicketPage},
    requests::{CreateTicket, UpdateTicket},
    sink::{ActivitySink, DbActivitySink},
    sla::{self, DeadlineStrategy, SlaSnapshot, WallClockDeadlines, classify_sla},
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TicketWithSla {
    #[serde(flatten)]
    #[ts(flatten)]
    pub ticket: Ticket,
    pub tags: Vec<Tag>,
    pub sla: SlaSnapshot,
}

impl std::ops::Deref for TicketWithSla {
    type Target = Ticket;
    fn deref(&self) -> &Self::Target {
        &self.ticket
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TicketDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub ticket: Ticket,
    pub tags: Vec<Tag>,
    pub messages: Vec<Message>,
    pub activities: Vec<Activity>,
    pub sla: SlaSnapshot,
}

impl std::ops::Deref for TicketDetail {
    type Target = Ticket;
    fn deref(&self) -> &Self::Target {
        &self.ticket
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct OrganizationCreated {
    pub organization: Organization,
    pub owner: Member,
    pub policies: Vec<SlaPolicy>,
}

/// Ticket lifecycle operations. Every call is scoped to the actor's
/// organization and every mutation commits in a single transaction.
#[derive(Clone)]
pub struct TicketService {
    db: DbPool,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ActivitySink>,
    deadlines: Arc<dyn DeadlineStrategy>,
    lifecycle: LifecycleConfig,
}

impl TicketService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            sink: Arc::new(DbActivitySink),
            deadlines: Arc::new(WallClockDeadlines),
            lifecycle: LifecycleConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_deadline_strategy(mut self, deadlines: Arc<dyn DeadlineStrategy>) -> Self {
        self.deadlines = deadlines;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: LifecycleConfig) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // Organizations

    /// Creates an organization with `owner` as its OWNER member and the
    /// default SLA policy table.
    pub async fn create_organization(
        &self,
        name: &str,
        owner: &CreateMember,
    ) -> Result<OrganizationCreated> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TicketError::Validation(
                "Organization name is required".to_string(),
            ));
        }
        retry_on_sqlite_busy(move || self.create_organization_once(name, owner)).await
    }

    async fn create_organization_once(
        &self,
        name: &str,
        owner: &CreateMember,
    ) -> Result<OrganizationCreated> {
        let now = self.now();
        let tx = self.db.begin().await?;

        let slug = unique_slug(&tx, name).await?;
        let organization = Organization::create(&tx, Uuid::new_v4(), name, &slug, now).await?;
        let owner = Member::create(
            &tx,
            organization.id,
            &CreateMember {
                role: MemberRole::Owner,
                ..owner.clone()
            },
            now,
        )
        .await?;

        let mut policies = Vec::with_capacity(sla::DEFAULT_POLICIES.len());
        for policy in sla::default_policies() {
            policies.push(SlaPolicy::create(&tx, organization.id, &policy, now).await?);
        }

        tx.commit().await?;
        tracing::info!(
            org_id = %organization.id,
            slug = %organization.slug,
            "organization created"
        );
        Ok(OrganizationCreated {
            organization,
            owner,
            policies,
        })
    }

    pub async fn list_members(&self, actor: &Actor) -> Result<Vec<Member>> {
        Ok(Member::list_for_org(&self.db, actor.org_id).await?)
    }

    /// Adds a member to the actor's organization. Ownership is only granted
    /// at creation time.
    pub async fn add_member(&self, actor: &Actor, member: &CreateMember) -> Result<Member> {
        if member.name.trim().is_empty() || member.email.trim().is_empty() {
            return Err(TicketError::Validation(
                "Member name and email are required".to_string(),
            ));
        }
        if member.role == MemberRole::Owner {
            return Err(TicketError::Validation(
                "An organization has a single owner".to_string(),
            ));
        }
        retry_on_sqlite_busy(move || async move {
            let tx = self.db.begin().await?;
            if Member::find_by_user(&tx, actor.org_id, member.user_id)
                .await?
                .is_some()
            {
                return Err(TicketError::ConflictingState(
                    "User is already a member".to_string(),
                ));
            }
            let created = Member::create(&tx, actor.org_id, member, self.now()).await?;
            tx.commit().await?;
            tracing::info!(org_id = %actor.org_id, user_id = %created.user_id, "member added");
            Ok(created)
        })
        .await
    }

    // Tickets

    pub async fn create_ticket(&self, actor: &Actor, payload: &CreateTicket) -> Result<Ticket> {
        let title = payload.title.trim();
        if title.is_empty() {
            return Err(TicketError::Validation("Title is required".to_string()));
        }
        retry_on_sqlite_busy(move || self.create_ticket_once(actor, title, payload)).await
    }

    async fn create_ticket_once(
        &self,
        actor: &Actor,
        title: &str,
        payload: &CreateTicket,
    ) -> Result<Ticket> {
        let now = self.now();
        let tx = self.db.begin().await?;

        if let Some(assignee) = payload.assignee_id {
            ensure_member(&tx, actor.org_id, assignee).await?;
        }

        let customer_id = match (payload.customer_id, non_blank(&payload.customer_email)) {
            (Some(id), _) => Some(
                Customer::find_by_id(&tx, actor.org_id, id)
                    .await?
                    .ok_or_else(|| TicketError::NotFound("Customer not found".to_string()))?
                    .id,
            ),
            (None, Some(email)) => Some(
                Customer::upsert_by_email(
                    &tx,
                    actor.org_id,
                    email,
                    non_blank(&payload.customer_name),
                    now,
                )
                .await?
                .id,
            ),
            (None, None) => None,
        };

        let number = Organization::allocate_ticket_number(&tx, actor.org_id).await?;
        let policy = SlaPolicy::find_for_priority(&tx, actor.org_id, payload.priority).await?;
        let deadlines = policy
            .as_ref()
            .map(|policy| self.deadlines.deadlines(policy, now));

        let ticket = Ticket::create(
            &tx,
            &NewTicketRecord {
                id: Uuid::new_v4(),
                org_id: actor.org_id,
                number,
                title: title.to_string(),
                description: non_blank(&payload.description).map(str::to_string),
                status: TicketStatus::Open,
                priority: payload.priority,
                channel: payload.channel,
                assignee_id: payload.assignee_id,
                customer_id,
                sla_policy_id: policy.as_ref().map(|policy| policy.id),
                first_response_due: deadlines.map(|d| d.first_response_due),
                sla_deadline: deadlines.map(|d| d.resolution_due),
                created_at: now,
            },
        )
        .await?;

        let tags = normalize_tag_names(&payload.tags);
        if !tags.is_empty() {
            Tag::set_for_ticket(&tx, actor.org_id, ticket.id, &tags, now).await?;
        }

        self.sink
            .append(
                &tx,
                &NewActivity::new(
                    ticket.id,
                    Some(actor.user_id),
                    ACTIVITY_TICKET_CREATED,
                    &TicketCreatedPayload {
                        title: ticket.title.clone(),
                    },
                    now,
                ),
            )
            .await?;

        tx.commit().await?;
        tracing::info!(
            org_id = %actor.org_id,
            ticket_id = %ticket.id,
            number = ticket.number,
            "ticket created"
        );
        Ok(ticket)
    }

    pub async fn get_ticket(&self, actor: &Actor, ticket_id: Uuid) -> Result<TicketDetail> {
        let ticket = Ticket::find_in_org(&self.db, actor.org_id, ticket_id)
            .await?
            .ok_or_else(ticket_not_found)?;
        let tags = Tag::for_ticket(&self.db, ticket.id).await?;
        let messages = Message::list_for_ticket(&self.db, ticket.id).await?;
        let activities = Activity::list_for_ticket(&self.db, ticket.id).await?;
        let sla = classify_sla(self.now(), ticket.sla_deadline);
        Ok(TicketDetail {
            ticket,
            tags,
            messages,
            activities,
            sla,
        })
    }

    pub async fn list_tickets(
        &self,
        actor: &Actor,
        filters: &TicketFilters,
        sort: TicketSort,
        page: PageRequest,
    ) -> Result<TicketPage<TicketWithSla>> {
        let now = self.now();
        let (tickets, total) = Ticket::query(
            &self.db,
            actor.org_id,
            filters,
            sort,
            page.offset(),
            page.page_size,
            now,
        )
        .await?;

        let mut items = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let tags = Tag::for_ticket(&self.db, ticket.id).await?;
            let sla = classify_sla(now, ticket.sla_deadline);
            items.push(TicketWithSla { ticket, tags, sla });
        }

        tracing::debug!(org_id = %actor.org_id, total, page = page.page, "tickets listed");
        Ok(TicketPage::new(items, total, page))
    }

    /// Moves a ticket to `status` (its wire name). Any status may follow any
    /// other.
    pub async fn transition_status(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        status: &str,
    ) -> Result<Ticket> {
        let to = parse_status(status)?;
        let patch = UpdateTicket {
            status: Some(to.to_string()),
            ..Default::default()
        };
        let patch = &patch;
        retry_on_sqlite_busy(move || self.update_ticket_once(actor, ticket_id, patch)).await
    }

    pub async fn assign_ticket(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<Ticket> {
        let patch = UpdateTicket {
            assignee_id: Some(assignee_id),
            ..Default::default()
        };
        let patch = &patch;
        retry_on_sqlite_busy(move || self.update_ticket_once(actor, ticket_id, patch)).await
    }

    /// Applies a partial update and records one activity per changed field
    /// group.
    pub async fn update_ticket(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        patch: &UpdateTicket,
    ) -> Result<Ticket> {
        if let Some(status) = &patch.status {
            parse_status(status)?;
        }
        if patch.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(TicketError::Validation("Title cannot be empty".to_string()));
        }
        retry_on_sqlite_busy(move || self.update_ticket_once(actor, ticket_id, patch)).await
    }

    async fn update_ticket_once(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        patch: &UpdateTicket,
    ) -> Result<Ticket> {
        let now = self.now();
        let tx = self.db.begin().await?;
        let current = Ticket::find_in_org(&tx, actor.org_id, ticket_id)
            .await?
            .ok_or_else(ticket_not_found)?;

        let mut changes = TicketChanges::default();
        let mut activities: Vec<NewActivity> = Vec::new();
        let actor_id = Some(actor.user_id);

        if let Some(title) = patch.title.as_deref().map(str::trim)
            && title != current.title
        {
            changes.title = Some(title.to_string());
            activities.push(NewActivity::new(
                current.id,
                actor_id,
                ACTIVITY_TITLE_CHANGED,
                &TitleChangedPayload {
                    from: current.title.clone(),
                    to: title.to_string(),
                },
                now,
            ));
        }

        if let Some(description) = &patch.description
            && *description != current.description
        {
            changes.description = Some(description.clone());
            activities.push(NewActivity::new(
                current.id,
                actor_id,
                ACTIVITY_DESCRIPTION_CHANGED,
                &serde_json::json!({}),
                now,
            ));
        }

        if let Some(status) = &patch.status {
            let to = parse_status(status)?;
            if to != current.status || self.lifecycle.record_noop_transitions {
                self.apply_status(&current, to, now, &mut changes);
                activities.push(NewActivity::new(
                    current.id,
                    actor_id,
                    ACTIVITY_STATUS_CHANGED,
                    &StatusChangedPayload {
                        from: current.status,
                        to,
                    },
                    now,
                ));
            }
        }

        if let Some(priority) = patch.priority
            && priority != current.priority
        {
            changes.priority = Some(priority);
            activities.push(NewActivity::new(
                current.id,
                actor_id,
                ACTIVITY_PRIORITY_CHANGED,
                &PriorityChangedPayload {
                    from: current.priority,
                    to: priority,
                },
                now,
            ));
            if self.lifecycle.rebind_sla_on_priority_change
                && let Some(policy) =
                    SlaPolicy::find_for_priority(&tx, actor.org_id, priority).await?
                && Some(policy.id) != current.sla_policy_id
            {
                let deadlines = self.deadlines.deadlines(&policy, current.created_at);
                changes.sla_policy_id = Some(Some(policy.id));
                changes.first_response_due = Some(Some(deadlines.first_response_due));
                changes.sla_deadline = Some(Some(deadlines.resolution_due));
                activities.push(NewActivity::new(
                    current.id,
                    actor_id,
                    ACTIVITY_SLA_POLICY_CHANGED,
                    &SlaPolicyChangedPayload {
                        from: current.sla_policy_id,
                        to: policy.id,
                        priority,
                    },
                    now,
                ));
            }
        }

        if let Some(assignee) = patch.assignee_id
            && assignee != current.assignee_id
        {
            if let Some(user_id) = assignee {
                ensure_member(&tx, actor.org_id, user_id).await?;
            }
            changes.assignee_id = Some(assignee);
            activities.push(NewActivity::new(
                current.id,
                actor_id,
                ACTIVITY_ASSIGNEE_CHANGED,
                &AssigneeChangedPayload {
                    from: current.assignee_id,
                    to: assignee,
                },
                now,
            ));
        }

        if let Some(until) = patch.snooze_until
            && until != current.snooze_until
        {
            changes.snooze_until = Some(until);
            let kind = if until.is_some() {
                ACTIVITY_SNOOZED
            } else {
                ACTIVITY_UNSNOOZED
            };
            activities.push(NewActivity::new(
                current.id,
                actor_id,
                kind,
                &SnoozePayload { until },
                now,
            ));
        }

        if let Some(names) = &patch.tags {
            let wanted = normalize_tag_names(names);
            let existing: Vec<String> = Tag::for_ticket(&tx, current.id)
                .await?
                .into_iter()
                .map(|tag| tag.name)
                .collect();
            if !same_tag_set(&existing, &wanted) {
                Tag::set_for_ticket(&tx, actor.org_id, current.id, &wanted, now).await?;
                activities.push(NewActivity::new(
                    current.id,
                    actor_id,
                    ACTIVITY_TAGS_CHANGED,
                    &TagsChangedPayload { tags: wanted },
                    now,
                ));
            }
        }

        if activities.is_empty() {
            return Ok(current);
        }

        let updated = Ticket::save(&tx, actor.org_id, current.id, &changes, now).await?;
        for entry in &activities {
            self.sink.append(&tx, entry).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            ticket_id = %updated.id,
            activities = activities.len(),
            "ticket updated"
        );
        Ok(updated)
    }

    /// Status side effects: entering RESOLVED/CLOSED stamps `resolved_at`,
    /// leaving them applies the configured reopen policy.
    fn apply_status(
        &self,
        current: &Ticket,
        to: TicketStatus,
        now: DateTime<Utc>,
        changes: &mut TicketChanges,
    ) {
        changes.status = Some(to);
        if to == current.status {
            return;
        }
        if to.is_resolved() {
            changes.resolved_at = Some(Some(now));
        } else if current.status.is_resolved()
            && self.lifecycle.reopen_policy == ReopenPolicy::Clear
        {
            changes.resolved_at = Some(None);
        }
    }

    /// Deletes the ticket and everything hanging off it. Role checks happen
    /// before this is called.
    pub async fn delete_ticket(&self, actor: &Actor, ticket_id: Uuid) -> Result<()> {
        retry_on_sqlite_busy(move || async move {
            let tx = self.db.begin().await?;
            let removed = Ticket::delete(&tx, actor.org_id, ticket_id).await?;
            if removed == 0 {
                return Err(ticket_not_found());
            }
            tx.commit().await?;
            tracing::info!(org_id = %actor.org_id, %ticket_id, "ticket deleted");
            Ok(())
        })
        .await
    }

    // Messages

    /// Appends a reply or internal note. The first reply stamps
    /// `first_response_at`; later ones leave it alone.
    pub async fn record_message(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        payload: &CreateMessage,
    ) -> Result<Message> {
        let body = payload.body.trim();
        if body.is_empty() {
            return Err(TicketError::Validation(
                "Message body is required".to_string(),
            ));
        }
        let payload = CreateMessage {
            message_type: payload.message_type,
            body: body.to_string(),
            attachments: payload.attachments.clone(),
        };
        let payload = &payload;
        retry_on_sqlite_busy(move || self.record_message_once(actor, ticket_id, payload)).await
    }

    async fn record_message_once(
        &self,
        actor: &Actor,
        ticket_id: Uuid,
        payload: &CreateMessage,
    ) -> Result<Message> {
        let now = self.now();
        let tx = self.db.begin().await?;
        let ticket = Ticket::find_in_org(&tx, actor.org_id, ticket_id)
            .await?
            .ok_or_else(ticket_not_found)?;

        let message = Message::append(&tx, ticket.id, Some(actor.user_id), payload, now).await?;

        let mut changes = TicketChanges::default();
        if payload.message_type == MessageType::Reply && ticket.first_response_at.is_none() {
            changes.first_response_at = Some(Some(now));
        }
        Ticket::save(&tx, actor.org_id, ticket.id, &changes, now).await?;

        let kind = match payload.message_type {
            MessageType::Reply => ACTIVITY_REPLY_SENT,
            MessageType::Note => ACTIVITY_NOTE_ADDED,
        };
        self.sink
            .append(
                &tx,
                &NewActivity::new(
                    ticket.id,
                    Some(actor.user_id),
                    kind,
                    &MessagePayload {
                        message_id: message.id,
                    },
                    now,
                ),
            )
            .await?;

        tx.commit().await?;
        tracing::debug!(ticket_id = %ticket.id, message_id = %message.id, kind, "message recorded");
        Ok(message)
    }

    pub async fn list_messages(&self, actor: &Actor, ticket_id: Uuid) -> Result<Vec<Message>> {
        let ticket = Ticket::find_in_org(&self.db, actor.org_id, ticket_id)
            .await?
            .ok_or_else(ticket_not_found)?;
        Ok(Message::list_for_ticket(&self.db, ticket.id).await?)
    }

    // SLA policies

    pub async fn resolve_policy(
        &self,
        actor: &Actor,
        priority: TicketPriority,
    ) -> Result<SlaPolicy> {
        sla::resolve_policy(&self.db, actor.org_id, priority).await
    }

    pub async fn list_policies(&self, actor: &Actor) -> Result<Vec<SlaPolicy>> {
        Ok(SlaPolicy::list_for_org(&self.db, actor.org_id).await?)
    }

    /// Edits a policy. Tickets already bound to it keep their stored
    /// deadlines.
    pub async fn update_policy(
        &self,
        actor: &Actor,
        policy_id: Uuid,
        patch: &UpdateSlaPolicy,
    ) -> Result<SlaPolicy> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(TicketError::Validation(
                "Policy name cannot be empty".to_string(),
            ));
        }
        for minutes in [patch.first_response_min, patch.resolution_min]
            .into_iter()
            .flatten()
        {
            if minutes <= 0 {
                return Err(TicketError::Validation(
                    "SLA minutes must be positive".to_string(),
                ));
            }
        }
        retry_on_sqlite_busy(move || async move {
            let policy =
                SlaPolicy::update(&self.db, actor.org_id, policy_id, patch, self.now()).await?;
            tracing::info!(policy_id = %policy.id, "SLA policy updated");
            Ok(policy)
        })
        .await
    }

    /// Removes a policy that no unresolved ticket depends on.
    pub async fn delete_policy(&self, actor: &Actor, policy_id: Uuid) -> Result<()> {
        retry_on_sqlite_busy(move || async move {
            let tx = self.db.begin().await?;
            if SlaPolicy::find_in_org(&tx, actor.org_id, policy_id)
                .await?
                .is_none()
            {
                return Err(TicketError::NotFound("SLA policy not found".to_string()));
            }
            let in_use = SlaPolicy::count_unresolved_tickets(&tx, actor.org_id, policy_id).await?;
            if in_use > 0 {
                return Err(TicketError::PolicyInUse(in_use));
            }
            SlaPolicy::delete(&tx, actor.org_id, policy_id).await?;
            tx.commit().await?;
            tracing::info!(%policy_id, "SLA policy deleted");
            Ok(())
        })
        .await
    }
}

fn ticket_not_found() -> TicketError {
    TicketError::NotFound("Ticket not found".to_string())
}

fn parse_status(value: &str) -> Result<TicketStatus> {
    TicketStatus::from_str(value.trim()).map_err(|_| TicketError::InvalidStatus(value.to_string()))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn same_tag_set(existing: &[String], wanted: &[String]) -> bool {
    existing.len() == wanted.len() && wanted.iter().all(|name| existing.contains(name))
}

async fn ensure_member(tx: &DatabaseTransaction, org_id: Uuid, user_id: Uuid) -> Result<()> {
    match Member::find_by_user(tx, org_id, user_id).await? {
        Some(_) => Ok(()),
        None => Err(TicketError::InvalidAssignee(user_id)),
    }
}

/// Lowercase ASCII slug of `name`, suffixed `-2`, `-3`, ... until unused.
async fn unique_slug(tx: &DatabaseTransaction, name: &str) -> Result<String> {
    let base = slugify(name);
    let mut candidate = base.clone();
    let mut suffix = 2;
    while Organization::slug_exists(tx, &candidate).await? {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    Ok(candidate)
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "org".to_string()
    } else {
        slug
    }
}
