//! Create `service_requests` table with FKs to `profiles`.
//!
//! Status/assignment invariants are enforced with table checks so that a
//! conditional update can never leave a row in an impossible state.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRequests::Id).primary_key())
                    .col(uuid(ServiceRequests::ClientId))
                    .col(uuid_null(ServiceRequests::SpecialistId))
                    .col(string_len(ServiceRequests::ServiceType, 128))
                    .col(text(ServiceRequests::Description))
                    .col(string_len(ServiceRequests::Location, 255))
                    .col(
                        double_null(ServiceRequests::Price)
                            .check(Expr::col(ServiceRequests::Price).gte(0.0)),
                    )
                    .col(date_null(ServiceRequests::PreferredDate))
                    .col(
                        string_len(ServiceRequests::Status, 16)
                            .default("pending")
                            .check(Expr::col(ServiceRequests::Status).is_in([
                                "pending",
                                "in_progress",
                                "completed",
                                "cancelled",
                            ])),
                    )
                    .col(timestamp_with_time_zone(ServiceRequests::CreatedAt))
                    .col(timestamp_with_time_zone(ServiceRequests::UpdatedAt))
                    .col(timestamp_with_time_zone_null(ServiceRequests::CompletedAt))
                    // completed_at 与 completed 状态一一对应
                    .check(Expr::cust("(status = 'completed') = (completed_at IS NOT NULL)"))
                    // pending 时不得绑定专家；进行中/已完成必须绑定
                    .check(Expr::cust("status <> 'pending' OR specialist_id IS NULL"))
                    .check(Expr::cust(
                        "status NOT IN ('in_progress', 'completed') OR specialist_id IS NOT NULL",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_request_client")
                            .from(ServiceRequests::Table, ServiceRequests::ClientId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_request_specialist")
                            .from(ServiceRequests::Table, ServiceRequests::SpecialistId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceRequests::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
    ClientId,
    SpecialistId,
    ServiceType,
    Description,
    Location,
    Price,
    PreferredDate,
    Status,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum Profiles { Table, Id }
