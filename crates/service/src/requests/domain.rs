use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Display label shown to users (pt-BR).
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pendente",
            RequestStatus::InProgress => "Em Andamento",
            RequestStatus::Completed => "Concluído",
            RequestStatus::Cancelled => "Cancelado",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| RequestError::Validation(format!("unknown status: {s}")))
    }
}

/// Point-in-time snapshot of a request as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub specialist_id: Option<Uuid>,
    pub service_type: String,
    pub description: String,
    pub location: String,
    pub price: Option<f64>,
    pub preferred_date: Option<NaiveDate>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    /// In the open pool: pending and nobody assigned.
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Pending && self.specialist_id.is_none()
    }

    /// Price with a missing estimate counted as zero.
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// Submission payload from a client. Status, owner and specialist are never accepted from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewServiceRequest {
    pub service_type: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
}

impl NewServiceRequest {
    /// Trim text fields and check required/price rules before any state change.
    pub fn normalized(mut self) -> Result<Self, RequestError> {
        self.service_type = self.service_type.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        for (field, value) in [
            ("service_type", &self.service_type),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.is_empty() {
                return Err(RequestError::Validation(format!("{field} required")));
            }
        }
        if self.service_type.chars().count() > 128 {
            return Err(RequestError::Validation("service_type too long (<=128)".into()));
        }
        if self.location.chars().count() > 255 {
            return Err(RequestError::Validation("location too long (<=255)".into()));
        }
        if let Some(p) = self.price {
            if !p.is_finite() || p < 0.0 {
                return Err(RequestError::Validation("price must be a non-negative number".into()));
            }
        }
        Ok(self)
    }
}
