//! `warden-auth` — pure user/role security model.
//!
//! This crate is intentionally decoupled from storage: records arrive from a
//! store, are translated through the role registry, and become a `Principal`.

pub mod authorize;
pub mod principal;
pub mod role_type;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, require_role};
pub use principal::Principal;
pub use role_type::RoleType;
pub use roles::Role;
pub use user::{User, Username};
