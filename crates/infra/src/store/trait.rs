use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use warden_auth::{Principal, Role, User, Username};
use warden_core::UserId;

/// Store operation error.
///
/// "Not found" is not an error at this layer: lookups return `Ok(None)` or an
/// empty vector. Everything here means the store could not answer, and must
/// never be turned into an empty-but-successful result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read-only access to user records.
///
/// Every call may block on I/O; run it from an async context or a worker pool.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Resolve the single user whose username equals `username` exactly.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError>;

    /// Resolve a user by its identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Read-only access to role assignment records.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// All role records assigned to `user_id`.
    ///
    /// Unknown users yield an empty vector, not an error. Order is unspecified.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Role>, StoreError>;
}

/// A store that can build a full principal (user + roles).
///
/// The default implementation issues two independent reads. Backends that can
/// read both inside one consistent snapshot should override it.
#[async_trait]
pub trait PrincipalStore: UserStore + RoleStore {
    async fn load_principal(&self, username: &Username) -> Result<Option<Principal>, StoreError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        let roles = self.find_by_user_id(user.id).await?;
        Ok(Some(Principal::from_records(user, &roles)))
    }
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        (**self).find_by_username(username).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<S> RoleStore for Arc<S>
where
    S: RoleStore + ?Sized,
{
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        (**self).find_by_user_id(user_id).await
    }
}

#[async_trait]
impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    async fn load_principal(&self, username: &Username) -> Result<Option<Principal>, StoreError> {
        (**self).load_principal(username).await
    }
}
