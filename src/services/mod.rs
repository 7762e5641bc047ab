//! Business logic invoked by the HTTP routes.
//!
//! Services are generic over the repository traits so they can run against
//! [`crate::repository::DieselRepository`] in production and the in-memory
//! test repository in unit tests.

pub mod categories;
pub mod errors;
pub mod movements;
pub mod products;

pub use errors::{ServiceError, ServiceResult};
