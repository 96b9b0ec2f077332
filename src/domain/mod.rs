//! Domain layer - Pure business abstractions
//!
//! Trait definitions, reference-data DTOs and the domain error type.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
