//! Profiles: the role and display data attached to an identity-provider user.

pub mod domain;
pub mod errors;
pub mod repository;
#[cfg(feature = "seaorm")]
pub mod repo;
pub mod service;

pub use domain::{CompleteProfileInput, Profile, ProfileUpdate};
pub use errors::ProfileError;
pub use service::ProfileService;
