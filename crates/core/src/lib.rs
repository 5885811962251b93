//! `warden-core` — identity primitives shared by the security model and stores.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{RoleId, UserId};
