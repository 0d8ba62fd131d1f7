//! Service layer for the marketplace: request lifecycle, role policy, reporting and role views.
//! - Separates business rules from persistence (repositories are traits).
//! - SeaORM-backed repositories live behind the `seaorm` feature; in-memory ones are always available.
//! - Errors are typed per module and wrapped by [`errors::ServiceError`] where modules compose.

pub mod errors;
pub mod identity;
pub mod pagination;
pub mod profiles;
pub mod requests;
pub mod reports;
pub mod views;
#[cfg(all(test, feature = "seaorm"))]
pub mod test_support;

pub use identity::{Actor, Role};
