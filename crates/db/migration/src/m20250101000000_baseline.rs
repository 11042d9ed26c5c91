use sea_orm_migration::prelude::*;

use crate::columns::{enum_col, fk_id_col, pk_id_col, timestamp_col, uuid_col};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Organizations::Table)
                    .col(pk_id_col(manager, Organizations::Id))
                    .col(uuid_col(Organizations::Uuid))
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(ColumnDef::new(Organizations::Slug).string().not_null())
                    .col(
                        ColumnDef::new(Organizations::NextTicketNumber)
                            .integer()
                            .not_null()
                            .default(Expr::val(1)),
                    )
                    .col(timestamp_col(Organizations::CreatedAt))
                    .col(timestamp_col(Organizations::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_organizations_uuid")
                    .table(Organizations::Table)
                    .col(Organizations::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_organizations_slug")
                    .table(Organizations::Table)
                    .col(Organizations::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Members::Table)
                    .col(pk_id_col(manager, Members::Id))
                    .col(uuid_col(Members::Uuid))
                    .col(fk_id_col(manager, Members::OrgId))
                    .col(uuid_col(Members::UserId))
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Email).string().not_null())
                    .col(enum_col(Members::Role, "AGENT"))
                    .col(timestamp_col(Members::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_org_id")
                            .from(Members::Table, Members::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_members_org_user")
                    .table(Members::Table)
                    .col(Members::OrgId)
                    .col(Members::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Customers::Table)
                    .col(pk_id_col(manager, Customers::Id))
                    .col(uuid_col(Customers::Uuid))
                    .col(fk_id_col(manager, Customers::OrgId))
                    .col(ColumnDef::new(Customers::Email).string().not_null())
                    .col(ColumnDef::new(Customers::Name).string())
                    .col(ColumnDef::new(Customers::Company).string())
                    .col(timestamp_col(Customers::CreatedAt))
                    .col(timestamp_col(Customers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_org_id")
                            .from(Customers::Table, Customers::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_customers_org_email")
                    .table(Customers::Table)
                    .col(Customers::OrgId)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(SlaPolicies::Table)
                    .col(pk_id_col(manager, SlaPolicies::Id))
                    .col(uuid_col(SlaPolicies::Uuid))
                    .col(fk_id_col(manager, SlaPolicies::OrgId))
                    .col(ColumnDef::new(SlaPolicies::Name).string().not_null())
                    .col(enum_col(SlaPolicies::Priority, "MEDIUM"))
                    .col(ColumnDef::new(SlaPolicies::FirstResponseMin).integer().not_null())
                    .col(ColumnDef::new(SlaPolicies::ResolutionMin).integer().not_null())
                    .col(
                        ColumnDef::new(SlaPolicies::BusinessHoursOnly)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(SlaPolicies::CreatedAt))
                    .col(timestamp_col(SlaPolicies::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sla_policies_org_id")
                            .from(SlaPolicies::Table, SlaPolicies::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_sla_policies_org_priority")
                    .table(SlaPolicies::Table)
                    .col(SlaPolicies::OrgId)
                    .col(SlaPolicies::Priority)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tags::Table)
                    .col(pk_id_col(manager, Tags::Id))
                    .col(uuid_col(Tags::Uuid))
                    .col(fk_id_col(manager, Tags::OrgId))
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::Color).string())
                    .col(timestamp_col(Tags::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_org_id")
                            .from(Tags::Table, Tags::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tags_org_name")
                    .table(Tags::Table)
                    .col(Tags::OrgId)
                    .col(Tags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SlaPolicies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    Uuid,
    Name,
    Slug,
    NextTicketNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    Uuid,
    OrgId,
    UserId,
    Name,
    Email,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Uuid,
    OrgId,
    Email,
    Name,
    Company,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SlaPolicies {
    Table,
    Id,
    Uuid,
    OrgId,
    Name,
    Priority,
    FirstResponseMin,
    ResolutionMin,
    BusinessHoursOnly,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Uuid,
    OrgId,
    Name,
    Color,
    CreatedAt,
}
