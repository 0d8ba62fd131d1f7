//! Listing filters shared by the in-memory and SeaORM repositories.

use serde::{de, Deserialize, Deserializer};
use uuid::Uuid;

use super::domain::{RequestStatus, ServiceRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialistFilter {
    #[default]
    Any,
    Unassigned,
    Is(Uuid),
}

/// Filter, order and window for a request listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestQuery {
    pub client_id: Option<Uuid>,
    pub specialist: SpecialistFilter,
    pub status: Option<RequestStatus>,
    pub newest_first: bool,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl Default for RequestQuery {
    fn default() -> Self {
        Self {
            client_id: None,
            specialist: SpecialistFilter::Any,
            status: None,
            newest_first: true,
            limit: None,
            offset: 0,
        }
    }
}

impl RequestQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_client(client_id: Uuid) -> Self {
        Self { client_id: Some(client_id), ..Self::default() }
    }

    /// Pending and unassigned.
    pub fn open_pool() -> Self {
        Self {
            specialist: SpecialistFilter::Unassigned,
            status: Some(RequestStatus::Pending),
            ..Self::default()
        }
    }

    pub fn for_specialist(specialist_id: Uuid) -> Self {
        Self { specialist: SpecialistFilter::Is(specialist_id), ..Self::default() }
    }

    pub fn window(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, req: &ServiceRequest) -> bool {
        if let Some(cid) = self.client_id {
            if req.client_id != cid {
                return false;
            }
        }
        if let Some(st) = self.status {
            if req.status != st {
                return false;
            }
        }
        match self.specialist {
            SpecialistFilter::Any => true,
            SpecialistFilter::Unassigned => req.specialist_id.is_none(),
            SpecialistFilter::Is(sid) => req.specialist_id == Some(sid),
        }
    }

    /// Filter, order by `created_at` (id breaks ties) and window a snapshot in memory.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<ServiceRequest>
    where
        I: IntoIterator<Item = &'a ServiceRequest>,
    {
        let mut out: Vec<ServiceRequest> = rows.into_iter().filter(|r| self.matches(r)).cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if self.newest_first {
            out.reverse();
        }
        let skipped = out.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(n) => skipped.take(n as usize).collect(),
            None => skipped.collect(),
        }
    }
}

/// Status filter as clients send it: `all` or one status name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RequestStatus),
}

impl StatusFilter {
    pub fn admits(self, status: RequestStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == "all" {
            return Ok(StatusFilter::All);
        }
        raw.parse::<RequestStatus>()
            .map(StatusFilter::Only)
            .map_err(de::Error::custom)
    }
}

/// Narrow a client's request list by status and a case-insensitive term over
/// service type and description. A blank term matches everything.
pub fn search(rows: &[ServiceRequest], status: StatusFilter, term: &str) -> Vec<ServiceRequest> {
    let needle = term.trim().to_lowercase();
    rows.iter()
        .filter(|r| status.admits(r.status))
        .filter(|r| {
            needle.is_empty()
                || r.service_type.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
