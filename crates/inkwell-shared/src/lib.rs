//! # Inkwell Shared
//!
//! Wire types for the JSON API and the site surface.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldError, MessageResponse};
