use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Client view: own requests, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_service_request_client_created")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::ClientId)
                    .col(ServiceRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Specialist view: claimed/completed jobs
        manager
            .create_index(
                Index::create()
                    .name("idx_service_request_specialist")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::SpecialistId)
                    .to_owned(),
            )
            .await?;

        // Open pool scan and status counts
        manager
            .create_index(
                Index::create()
                    .name("idx_service_request_status_created")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::Status)
                    .col(ServiceRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Profiles: role partition for admin counts
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_role")
                    .table(Profiles::Table)
                    .col(Profiles::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_profile_role").table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_request_status_created").table(ServiceRequests::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_request_specialist").table(ServiceRequests::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_request_client_created").table(ServiceRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceRequests { Table, SpecialistId, ClientId, Status, CreatedAt }

#[derive(DeriveIden)]
enum Profiles { Table, Role }
