//! Service-request lifecycle: domain, state machine, role policy, query layer,
//! repository abstraction and the application service on top.

pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod policy;
pub mod query;
pub mod repository;
#[cfg(feature = "seaorm")]
pub mod repo;
pub mod service;

pub use domain::{NewServiceRequest, RequestStatus, ServiceRequest};
pub use errors::RequestError;
pub use service::RequestService;
