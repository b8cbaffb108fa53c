//! Domain layer - framework-agnostic error taxonomy

pub mod errors;

pub use errors::DomainError;
