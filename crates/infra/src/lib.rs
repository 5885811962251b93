//! Infrastructure layer: user/role stores, the directory boundary, DB config.

pub mod config;
pub mod directory;
pub mod store;

pub use config::{ConfigError, StoreConfig, connect_pool};
pub use directory::{DirectoryError, SecurityDirectory};
pub use store::{
    InMemorySecurityStore, PostgresSecurityStore, PrincipalStore, RoleStore, StoreError, UserStore,
};
