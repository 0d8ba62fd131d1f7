use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{prelude::DateTimeWithTimeZone, DatabaseConnection, EntityTrait};
use tokio::sync::Barrier;
use uuid::Uuid;

use crate::profile::{self, NewProfile};
use crate::service_request::{self, Assignment, Change, Draft, Guard, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING};

use super::setup_test_db;

async fn seed_profile(db: &DatabaseConnection, role: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    profile::create(db, NewProfile { id, full_name: "Seed", role, phone: None, avatar_url: None, bio: None }).await?;
    Ok(id)
}

fn claim_by(specialist: Uuid) -> (Guard, Change) {
    let now: DateTimeWithTimeZone = Utc::now().into();
    (
        Guard { status: STATUS_PENDING, assignment: Assignment::Unassigned, client_id: None },
        Change { status: STATUS_IN_PROGRESS, specialist_id: Some(specialist), completed_at: None, updated_at: now },
    )
}

async fn cleanup(db: &DatabaseConnection, request_id: Uuid, profiles: &[Uuid]) -> Result<()> {
    service_request::Entity::delete_by_id(request_id).exec(db).await?;
    for id in profiles {
        profile::Entity::delete_by_id(*id).exec(db).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_create_forces_pending_and_unassigned() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let client = seed_profile(&db, profile::ROLE_CLIENT).await?;

    let created = service_request::create(&db, Draft {
        client_id: client,
        service_type: "Pintor",
        description: "Pintar sala",
        location: "São Paulo",
        price: Some(350.0),
        preferred_date: None,
    })
    .await?;
    assert_eq!(created.status, STATUS_PENDING);
    assert!(created.specialist_id.is_none());
    assert!(created.completed_at.is_none());

    cleanup(&db, created.id, &[client]).await
}

#[tokio::test]
async fn test_update_if_claim_race_has_single_winner() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let client = seed_profile(&db, profile::ROLE_CLIENT).await?;
    let first = seed_profile(&db, profile::ROLE_SPECIALIST).await?;
    let second = seed_profile(&db, profile::ROLE_SPECIALIST).await?;

    let created = service_request::create(&db, Draft {
        client_id: client,
        service_type: "Encanador",
        description: "Vazamento",
        location: "Recife",
        price: None,
        preferred_date: None,
    })
    .await?;

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for specialist in [first, second] {
        let db = db.clone();
        let barrier = barrier.clone();
        let id = created.id;
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let (guard, change) = claim_by(specialist);
            service_request::update_if(&db, id, guard, change).await
        }));
    }

    let mut winners = Vec::new();
    for h in handles {
        if let Some(row) = h.await?? {
            winners.push(row.specialist_id);
        }
    }
    assert_eq!(winners.len(), 1);

    let stored = service_request::find_by_id(&db, created.id).await?.expect("row");
    assert_eq!(stored.status, STATUS_IN_PROGRESS);
    assert_eq!(stored.specialist_id, winners[0]);

    cleanup(&db, created.id, &[client, first, second]).await
}

#[tokio::test]
async fn test_update_if_respects_assignment_guard() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let client = seed_profile(&db, profile::ROLE_CLIENT).await?;
    let owner = seed_profile(&db, profile::ROLE_SPECIALIST).await?;
    let other = seed_profile(&db, profile::ROLE_SPECIALIST).await?;

    let created = service_request::create(&db, Draft {
        client_id: client,
        service_type: "Chaveiro",
        description: "Trocar fechadura",
        location: "Curitiba",
        price: Some(80.0),
        preferred_date: None,
    })
    .await?;
    let (guard, change) = claim_by(owner);
    assert!(service_request::update_if(&db, created.id, guard, change).await?.is_some());

    let now: DateTimeWithTimeZone = Utc::now().into();
    let complete = |sid| (
        Guard { status: STATUS_IN_PROGRESS, assignment: Assignment::AssignedTo(sid), client_id: None },
        Change { status: STATUS_COMPLETED, specialist_id: Some(sid), completed_at: Some(now), updated_at: now },
    );

    let (guard, change) = complete(other);
    assert!(service_request::update_if(&db, created.id, guard, change).await?.is_none());

    let (guard, change) = complete(owner);
    let done = service_request::update_if(&db, created.id, guard, change).await?.expect("completed");
    assert_eq!(done.status, STATUS_COMPLETED);
    assert!(done.completed_at.is_some());

    cleanup(&db, created.id, &[client, owner, other]).await
}
