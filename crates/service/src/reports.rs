//! Aggregations over request and profile snapshots.
//!
//! Everything here is a pure function of its inputs; callers decide what snapshot
//! to pass and when to refresh it.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::identity::Role;
use crate::profiles::Profile;
use crate::requests::{RequestStatus, ServiceRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub total: u64,
    pub clients: u64,
    pub specialists: u64,
    pub admins: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl StatusCounts {
    pub fn of(&self, status: RequestStatus) -> u64 {
        match status {
            RequestStatus::Pending => self.pending,
            RequestStatus::InProgress => self.in_progress,
            RequestStatus::Completed => self.completed,
            RequestStatus::Cancelled => self.cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformStats {
    pub users: UserCounts,
    pub requests: StatusCounts,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    /// completed / total requests, 0 on an empty platform.
    pub completion_rate: f64,
}

/// What a client sees about their own requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpecialistStats {
    /// Size of the open pool right now.
    pub available: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub earnings: f64,
}

pub fn user_counts(profiles: &[Profile]) -> UserCounts {
    profiles.iter().fold(UserCounts::default(), |mut acc, p| {
        acc.total += 1;
        match p.role {
            Role::Client => acc.clients += 1,
            Role::Specialist => acc.specialists += 1,
            Role::Admin => acc.admins += 1,
        }
        acc
    })
}

pub fn status_counts(requests: &[ServiceRequest]) -> StatusCounts {
    requests.iter().fold(StatusCounts::default(), |mut acc, r| {
        acc.total += 1;
        match r.status {
            RequestStatus::Pending => acc.pending += 1,
            RequestStatus::InProgress => acc.in_progress += 1,
            RequestStatus::Completed => acc.completed += 1,
            RequestStatus::Cancelled => acc.cancelled += 1,
        }
        acc
    })
}

fn completed_revenue<'a>(requests: impl IntoIterator<Item = &'a ServiceRequest>) -> f64 {
    requests
        .into_iter()
        .filter(|r| r.status == RequestStatus::Completed)
        .map(ServiceRequest::price_or_zero)
        .sum()
}

/// Sum of price over completed requests; a missing price counts as 0.
pub fn total_revenue(requests: &[ServiceRequest]) -> f64 {
    completed_revenue(requests)
}

/// Revenue from completed requests created in the same UTC month as `now`.
///
/// Bucketed by `created_at`, not `completed_at`: a job posted in March and
/// finished in April counts toward March.
pub fn monthly_revenue(requests: &[ServiceRequest], now: DateTime<Utc>) -> f64 {
    completed_revenue(
        requests
            .iter()
            .filter(|r| r.created_at.year() == now.year() && r.created_at.month() == now.month()),
    )
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub fn platform_stats(profiles: &[Profile], requests: &[ServiceRequest], now: DateTime<Utc>) -> PlatformStats {
    let counts = status_counts(requests);
    PlatformStats {
        users: user_counts(profiles),
        requests: counts,
        total_revenue: total_revenue(requests),
        monthly_revenue: monthly_revenue(requests, now),
        completion_rate: ratio(counts.completed, counts.total),
    }
}

pub fn client_stats(own: &[ServiceRequest]) -> ClientStats {
    let c = status_counts(own);
    ClientStats { total: c.total, pending: c.pending, in_progress: c.in_progress, completed: c.completed }
}

pub fn specialist_stats(open_pool: &[ServiceRequest], my_jobs: &[ServiceRequest]) -> SpecialistStats {
    let c = status_counts(my_jobs);
    SpecialistStats {
        available: open_pool.len() as u64,
        in_progress: c.in_progress,
        completed: c.completed,
        earnings: total_revenue(my_jobs),
    }
}
