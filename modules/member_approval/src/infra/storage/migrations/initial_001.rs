use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Members::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Generation).integer().not_null())
                    .col(ColumnDef::new(Members::Occupation).string().not_null())
                    .col(ColumnDef::new(Members::Phone).string().not_null())
                    .col(ColumnDef::new(Members::MessengerId).string().null())
                    .col(ColumnDef::new(Members::ProfileImage).string().null())
                    .col(
                        ColumnDef::new(Members::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::EmailConfirmedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Members::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Members::ApprovedBy).string().null())
                    .col(ColumnDef::new(Members::ApprovalNote).text().null())
                    .col(
                        ColumnDef::new(Members::RejectedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Members::RejectedBy).string().null())
                    .col(ColumnDef::new(Members::RejectionNote).text().null())
                    .to_owned(),
            )
            .await?;

        // Serves the pending list: status filter, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_members_status_created")
                    .table(Members::Table)
                    .col(Members::Status)
                    .col(Members::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Email,
    Name,
    Generation,
    Occupation,
    Phone,
    MessengerId,
    ProfileImage,
    Status,
    CreatedAt,
    EmailConfirmedAt,
    ApprovedAt,
    ApprovedBy,
    ApprovalNote,
    RejectedAt,
    RejectedBy,
    RejectionNote,
}
