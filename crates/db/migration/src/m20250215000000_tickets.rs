use sea_orm_migration::prelude::*;

use crate::columns::{
    enum_col, fk_id_col, fk_id_nullable_col, pk_id_col, timestamp_col, timestamp_nullable_col,
    uuid_col, uuid_nullable_col,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tickets::Table)
                    .col(pk_id_col(manager, Tickets::Id))
                    .col(uuid_col(Tickets::Uuid))
                    .col(fk_id_col(manager, Tickets::OrgId))
                    .col(ColumnDef::new(Tickets::Number).integer().not_null())
                    .col(ColumnDef::new(Tickets::Title).string().not_null())
                    .col(ColumnDef::new(Tickets::Description).text())
                    .col(enum_col(Tickets::Status, "OPEN"))
                    .col(enum_col(Tickets::Priority, "MEDIUM"))
                    .col(enum_col(Tickets::Channel, "EMAIL"))
                    .col(uuid_nullable_col(Tickets::AssigneeId))
                    .col(fk_id_nullable_col(manager, Tickets::CustomerId))
                    .col(fk_id_nullable_col(manager, Tickets::SlaPolicyId))
                    .col(timestamp_nullable_col(Tickets::FirstResponseDue))
                    .col(timestamp_nullable_col(Tickets::SlaDeadline))
                    .col(timestamp_nullable_col(Tickets::FirstResponseAt))
                    .col(timestamp_nullable_col(Tickets::ResolvedAt))
                    .col(timestamp_nullable_col(Tickets::SnoozeUntil))
                    .col(timestamp_col(Tickets::CreatedAt))
                    .col(timestamp_col(Tickets::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_org_id")
                            .from(Tickets::Table, Tickets::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_customer_id")
                            .from(Tickets::Table, Tickets::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_sla_policy_id")
                            .from(Tickets::Table, Tickets::SlaPolicyId)
                            .to(SlaPolicies::Table, SlaPolicies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_uuid")
                    .table(Tickets::Table)
                    .col(Tickets::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_org_status")
                    .table(Tickets::Table)
                    .col(Tickets::OrgId)
                    .col(Tickets::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_org_created_at")
                    .table(Tickets::Table)
                    .col(Tickets::OrgId)
                    .col(Tickets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_sla_policy_id")
                    .table(Tickets::Table)
                    .col(Tickets::SlaPolicyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TicketTags::Table)
                    .col(pk_id_col(manager, TicketTags::Id))
                    .col(fk_id_col(manager, TicketTags::TicketId))
                    .col(fk_id_col(manager, TicketTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_tags_ticket_id")
                            .from(TicketTags::Table, TicketTags::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_tags_tag_id")
                            .from(TicketTags::Table, TicketTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_ticket_tags_ticket_tag")
                    .table(TicketTags::Table)
                    .col(TicketTags::TicketId)
                    .col(TicketTags::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Messages::Table)
                    .col(pk_id_col(manager, Messages::Id))
                    .col(uuid_col(Messages::Uuid))
                    .col(fk_id_col(manager, Messages::TicketId))
                    .col(uuid_nullable_col(Messages::AuthorId))
                    .col(enum_col(Messages::MessageType, "REPLY"))
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(ColumnDef::new(Messages::Attachments).json().not_null())
                    .col(timestamp_col(Messages::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_ticket_id")
                            .from(Messages::Table, Messages::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_messages_ticket_created_at")
                    .table(Messages::Table)
                    .col(Messages::TicketId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Activities::Table)
                    .col(pk_id_col(manager, Activities::Id))
                    .col(uuid_col(Activities::Uuid))
                    .col(fk_id_col(manager, Activities::TicketId))
                    .col(uuid_nullable_col(Activities::ActorId))
                    .col(ColumnDef::new(Activities::Kind).string_len(64).not_null())
                    .col(ColumnDef::new(Activities::Data).json().not_null())
                    .col(timestamp_col(Activities::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_ticket_id")
                            .from(Activities::Table, Activities::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_activities_ticket_created_at")
                    .table(Activities::Table)
                    .col(Activities::TicketId)
                    .col(Activities::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TicketTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
}

#[derive(Iden)]
enum SlaPolicies {
    Table,
    Id,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
}

#[derive(Iden)]
enum Tickets {
    Table,
    Id,
    Uuid,
    OrgId,
    Number,
    Title,
    Description,
    Status,
    Priority,
    Channel,
    AssigneeId,
    CustomerId,
    SlaPolicyId,
    FirstResponseDue,
    SlaDeadline,
    FirstResponseAt,
    ResolvedAt,
    SnoozeUntil,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TicketTags {
    Table,
    Id,
    TicketId,
    TagId,
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    Uuid,
    TicketId,
    AuthorId,
    MessageType,
    Body,
    Attachments,
    CreatedAt,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    Uuid,
    TicketId,
    ActorId,
    Kind,
    Data,
    CreatedAt,
}
