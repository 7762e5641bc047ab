//! Domain entities and value objects, free of persistence and HTTP concerns.

pub mod category;
pub mod movement;
pub mod product;
pub mod types;
