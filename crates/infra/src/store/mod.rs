//! Read-only store boundary for users and their role assignments.
//!
//! Traits live in `trait`; `in_memory` backs tests/dev and `postgres` backs
//! production via sqlx.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemorySecurityStore;
pub use postgres::PostgresSecurityStore;
pub use r#trait::{PrincipalStore, RoleStore, StoreError, UserStore};
