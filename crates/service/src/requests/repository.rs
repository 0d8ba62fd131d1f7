use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{NewServiceRequest, ServiceRequest};
use super::errors::RequestError;
use super::lifecycle::Transition;
use super::query::RequestQuery;

/// Persistence for service requests.
///
/// `apply_transition` must be atomic with respect to other writers: the transition's
/// guard is evaluated and the new state written in one step, `Ok(None)` meaning the
/// guard did not hold at write time.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert(&self, client_id: Uuid, input: &NewServiceRequest) -> Result<ServiceRequest, RequestError>;
    async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, RequestError>;
    async fn find(&self, query: &RequestQuery) -> Result<Vec<ServiceRequest>, RequestError>;
    async fn apply_transition(
        &self,
        id: Uuid,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> Result<Option<ServiceRequest>, RequestError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::requests::domain::RequestStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockRequestRepository {
        rows: Mutex<HashMap<Uuid, ServiceRequest>>, // key: request id
    }

    impl MockRequestRepository {
        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl RequestRepository for MockRequestRepository {
        async fn insert(&self, client_id: Uuid, input: &NewServiceRequest) -> Result<ServiceRequest, RequestError> {
            let now = Utc::now();
            let req = ServiceRequest {
                id: Uuid::new_v4(),
                client_id,
                specialist_id: None,
                service_type: input.service_type.clone(),
                description: input.description.clone(),
                location: input.location.clone(),
                price: input.price,
                preferred_date: input.preferred_date,
                status: RequestStatus::Pending,
                created_at: now,
                updated_at: now,
                completed_at: None,
            };
            self.rows.lock().unwrap().insert(req.id, req.clone());
            Ok(req)
        }

        async fn get(&self, id: Uuid) -> Result<Option<ServiceRequest>, RequestError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find(&self, query: &RequestQuery) -> Result<Vec<ServiceRequest>, RequestError> {
            let rows = self.rows.lock().unwrap();
            Ok(query.apply(rows.values()))
        }

        async fn apply_transition(
            &self,
            id: Uuid,
            transition: &Transition,
            at: DateTime<Utc>,
        ) -> Result<Option<ServiceRequest>, RequestError> {
            // 同一把锁内判断并写入
            let mut rows = self.rows.lock().unwrap();
            let Some(current) = rows.get(&id) else { return Ok(None) };
            if !transition.guard().holds(current) {
                return Ok(None);
            }
            let next = transition.apply(current, at)?;
            rows.insert(id, next.clone());
            Ok(Some(next))
        }
    }
}
