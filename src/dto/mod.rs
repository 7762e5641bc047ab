//! JSON representations returned by the HTTP API.

pub mod categories;
pub mod movements;
pub mod products;
