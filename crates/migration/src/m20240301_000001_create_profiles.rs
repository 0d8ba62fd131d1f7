//! Create `profiles` table.
//!
//! One row per identity-provider user; `id` is the provider's subject.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(uuid(Profiles::Id).primary_key())
                    .col(string_len(Profiles::FullName, 128))
                    .col(
                        string_len(Profiles::Role, 16)
                            .check(Expr::col(Profiles::Role).is_in(["client", "specialist", "admin"])),
                    )
                    .col(string_len_null(Profiles::Phone, 32))
                    .col(string_len_null(Profiles::AvatarUrl, 512))
                    .col(text_null(Profiles::Bio))
                    .col(double(Profiles::Rating).default(0.0))
                    .col(integer(Profiles::CompletedJobs).default(0))
                    .col(timestamp_with_time_zone(Profiles::CreatedAt))
                    .col(timestamp_with_time_zone(Profiles::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Role,
    Phone,
    AvatarUrl,
    Bio,
    Rating,
    CompletedJobs,
    CreatedAt,
    UpdatedAt,
}
