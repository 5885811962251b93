//! Data-access boundary consumed by the authentication layer.
//!
//! Turns the store's `Option`/`Vec` results into an explicit outcome so callers
//! must tell "no such user" apart from "store down". No retries, no caching:
//! outages surface unchanged so callers can back off or trip a breaker.

use thiserror::Error;
use tracing::instrument;

use warden_auth::{Principal, Role, RoleType, User, Username};
use warden_core::UserId;

use crate::store::{PrincipalStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The queried entity does not exist.
    #[error("not found")]
    NotFound,

    /// The backing store could not answer; retry at the caller's discretion.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed query parameters, rejected before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<StoreError> for DirectoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => DirectoryError::StoreUnavailable(msg),
        }
    }
}

/// User and role lookups over any [`PrincipalStore`].
#[derive(Debug, Clone)]
pub struct SecurityDirectory<S> {
    store: S,
}

impl<S> SecurityDirectory<S>
where
    S: PrincipalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self), err)]
    pub async fn get_user_by_username(&self, name: &str) -> Result<User, DirectoryError> {
        let username = parse_username(name)?;
        self.store
            .find_by_username(&username)
            .await?
            .ok_or(DirectoryError::NotFound)
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    pub async fn get_roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, DirectoryError> {
        Ok(self.store.find_by_user_id(user_id).await?)
    }

    pub fn resolve_role_type(&self, name: &str) -> Option<RoleType> {
        RoleType::find_by_type(name)
    }

    /// Resolve a username into a principal with typed authorities.
    #[instrument(skip(self), err)]
    pub async fn load_principal(&self, name: &str) -> Result<Principal, DirectoryError> {
        let username = parse_username(name)?;
        let principal = self
            .store
            .load_principal(&username)
            .await?
            .ok_or(DirectoryError::NotFound)?;

        tracing::debug!(
            user_id = %principal.user_id(),
            authorities = principal.authorities.len(),
            "principal loaded"
        );
        Ok(principal)
    }
}

fn parse_username(name: &str) -> Result<Username, DirectoryError> {
    Username::parse(name).map_err(|e| DirectoryError::InvalidInput(e.to_string()))
}
