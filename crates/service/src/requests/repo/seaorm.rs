use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use models::service_request::{self as row, Assignment as RowAssignment, Change, Draft, Guard as RowGuard};

use crate::requests::domain::{NewServiceRequest, RequestStatus, ServiceRequest};
use crate::requests::errors::RequestError;
use crate::requests::lifecycle::{Assignment, Transition};
use crate::requests::query::{RequestQuery, SpecialistFilter};
use crate::requests::repository::RequestRepository;

pub struct SeaOrmRequestRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn store_err(e: impl std::fmt::Display) -> RequestError {
    RequestError::Store(e.to_string())
}

fn to_domain(m: row::Model) -> Result<ServiceRequest, RequestError> {
    let status = m
        .status
        .parse::<RequestStatus>()
        .map_err(|_| RequestError::Store(format!("unexpected status in store: {}", m.status)))?;
    Ok(ServiceRequest {
        id: m.id,
        client_id: m.client_id,
        specialist_id: m.specialist_id,
        service_type: m.service_type,
        description: m.description,
        location: m.location,
        price: m.price,
        preferred_date: m.preferred_date,
        status,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
        completed_at: m.completed_at.map(|t| t.with_timezone(&Utc)),
    })
}

fn row_guard(t: &Transition) -> RowGuard {
    let g = t.guard();
    RowGuard {
        status: g.status.as_str(),
        assignment: match g.assignment {
            Assignment::Unassigned => RowAssignment::Unassigned,
            Assignment::AssignedTo(id) => RowAssignment::AssignedTo(id),
        },
        client_id: g.client_id,
    }
}

fn row_change(t: &Transition, at: DateTime<Utc>) -> Change {
    let (specialist_id, completed_at) = match *t {
        Transition::Claim { specialist_id } => (Some(specialist_id), None),
        Transition::Complete { specialist_id } => (Some(specialist_id), Some(at.into())),
        Transition::Cancel { .. } => (None, None),
    };
    Change {
        status: t.to_status().as_str(),
        specialist_id,
        completed_at,
        updated_at: at.into(),
    }
}

#[async_trait::async_trait]
impl RequestRepository for SeaOrmRequestRepository {
    async fn insert(&self, client_id: Uuid, input: &NewServiceRequest) -> Result<ServiceRequest, RequestError> {
        let created = row::create(
            &self.db,
            Draft {
                client_id,
                service_type: &input.service_type,
                description: &input.description,
                location: &input.location,
                price: input.price,
                preferred_date: input.preferred_date,
            },
        )
        .await
        .map_err(|e| match e {
            models::errors::ModelError::Validation(msg) => RequestError::Validation(msg),
            other => store_err(other),
        })?;
        to_domain(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, RequestError> {
        row::find_by_id(&self.db, id)
            .await
            .map_err(store_err)?
            .map(to_domain)
            .transpose()
    }

    async fn find(&self, query: &RequestQuery) -> Result<Vec<ServiceRequest>, RequestError> {
        let mut select = row::Entity::find();
        if let Some(cid) = query.client_id {
            select = select.filter(row::Column::ClientId.eq(cid));
        }
        if let Some(st) = query.status {
            select = select.filter(row::Column::Status.eq(st.as_str()));
        }
        select = match query.specialist {
            SpecialistFilter::Any => select,
            SpecialistFilter::Unassigned => select.filter(row::Column::SpecialistId.is_null()),
            SpecialistFilter::Is(sid) => select.filter(row::Column::SpecialistId.eq(sid)),
        };
        select = if query.newest_first {
            select.order_by_desc(row::Column::CreatedAt).order_by_desc(row::Column::Id)
        } else {
            select.order_by_asc(row::Column::CreatedAt).order_by_asc(row::Column::Id)
        };
        if query.offset > 0 {
            select = select.offset(query.offset);
        }
        if let Some(n) = query.limit {
            select = select.limit(n);
        }
        let rows = select.all(&self.db).await.map_err(store_err)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> Result<Option<ServiceRequest>, RequestError> {
        let updated = row::update_if(&self.db, id, row_guard(transition), row_change(transition, at))
            .await
            .map_err(store_err)?;
        updated.map(to_domain).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::profile::{self, NewProfile};

    async fn repo_with_people() -> Option<(SeaOrmRequestRepository, Uuid, Uuid)> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return None;
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: db unavailable: {e}");
                return None;
            }
        };
        let client = Uuid::new_v4();
        let specialist = Uuid::new_v4();
        for (id, name, role) in [(client, "Ana Cliente", "client"), (specialist, "Beto Especialista", "specialist")] {
            profile::create(&db, NewProfile { id, full_name: name, role, phone: None, avatar_url: None, bio: None })
                .await
                .expect("create profile");
        }
        Some((SeaOrmRequestRepository::new(db), client, specialist))
    }

    fn input() -> NewServiceRequest {
        NewServiceRequest {
            service_type: "Marceneiro".into(),
            description: "Consertar porta do armário".into(),
            location: "Rua das Flores, 5".into(),
            price: Some(180.0),
            preferred_date: None,
        }
    }

    #[tokio::test]
    async fn full_lifecycle_round_trip() {
        let Some((repo, client, specialist)) = repo_with_people().await else { return };
        let created = repo.insert(client, &input()).await.unwrap();
        assert_eq!(created.status, RequestStatus::Pending);

        let claimed = repo
            .apply_transition(created.id, &Transition::Claim { specialist_id: specialist }, Utc::now())
            .await
            .unwrap()
            .expect("claim applies");
        assert_eq!(claimed.specialist_id, Some(specialist));

        let again = repo
            .apply_transition(created.id, &Transition::Claim { specialist_id: Uuid::new_v4() }, Utc::now())
            .await
            .unwrap();
        assert!(again.is_none());

        let done = repo
            .apply_transition(created.id, &Transition::Complete { specialist_id: specialist }, Utc::now())
            .await
            .unwrap()
            .expect("complete applies");
        assert_eq!(done.status, RequestStatus::Completed);
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn find_filters_by_client_and_pool() {
        let Some((repo, client, specialist)) = repo_with_people().await else { return };
        let a = repo.insert(client, &input()).await.unwrap();
        let b = repo.insert(client, &input()).await.unwrap();
        repo.apply_transition(b.id, &Transition::Claim { specialist_id: specialist }, Utc::now())
            .await
            .unwrap();

        let mine = repo.find(&RequestQuery::for_client(client)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, b.id, "newest first");

        let pool = repo.find(&RequestQuery::open_pool()).await.unwrap();
        assert!(pool.iter().any(|r| r.id == a.id));
        assert!(pool.iter().all(|r| r.id != b.id));

        let jobs = repo.find(&RequestQuery::for_specialist(specialist)).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, b.id);
    }
}
