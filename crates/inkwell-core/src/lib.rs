//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging site.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the error taxonomy, ports, the authorization policy and the services
//! that sequence them.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use policy::{Action, Principal, Resource, can_perform};
