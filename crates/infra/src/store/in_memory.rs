use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use warden_auth::{Principal, Role, User, Username};
use warden_core::{DomainError, DomainResult, RoleId, UserId};

use super::r#trait::{PrincipalStore, RoleStore, StoreError, UserStore};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    by_username: HashMap<Username, UserId>,
    roles: HashMap<RoleId, Role>,
}

/// In-memory user/role store.
///
/// Intended for tests/dev. Enforces the same constraints as the SQL schema:
/// unique usernames, role rows referencing an existing user, and one row per
/// `(user, role name)` pair.
#[derive(Debug, Default)]
pub struct InMemorySecurityStore {
    state: RwLock<State>,
    offline: AtomicBool,
}

impl InMemorySecurityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backend: while offline every read fails with
    /// `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn insert_user(&self, user: User) -> DomainResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::invariant("lock poisoned"))?;

        if state.users.contains_key(&user.id) {
            return Err(DomainError::conflict(format!("user id {} already exists", user.id)));
        }
        if state.by_username.contains_key(&user.username) {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        state.by_username.insert(user.username.clone(), user.id);
        state.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_role(&self, role: Role) -> DomainResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::invariant("lock poisoned"))?;

        if !state.users.contains_key(&role.user_id) {
            return Err(DomainError::validation(format!(
                "role {} references unknown user {}",
                role.id, role.user_id
            )));
        }
        if state.roles.contains_key(&role.id) {
            return Err(DomainError::conflict(format!("role id {} already exists", role.id)));
        }
        if state
            .roles
            .values()
            .any(|r| r.user_id == role.user_id && r.name == role.name)
        {
            return Err(DomainError::conflict(format!(
                "user {} already holds '{}'",
                role.user_id, role.name
            )));
        }

        state.roles.insert(role.id, role);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("in-memory store is offline"));
        }
        self.state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))
    }
}

fn roles_of(state: &State, user_id: UserId) -> Vec<Role> {
    let mut roles: Vec<Role> = state
        .roles
        .values()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect();
    roles.sort_by_key(|r| r.id);
    roles
}

#[async_trait]
impl UserStore for InMemorySecurityStore {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, StoreError> {
        let state = self.read()?;
        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let state = self.read()?;
        Ok(state.users.get(&id).cloned())
    }
}

#[async_trait]
impl RoleStore for InMemorySecurityStore {
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Role>, StoreError> {
        let state = self.read()?;
        Ok(roles_of(&state, user_id))
    }
}

#[async_trait]
impl PrincipalStore for InMemorySecurityStore {
    // One read guard for both lookups, so no insert can land in between.
    async fn load_principal(&self, username: &Username) -> Result<Option<Principal>, StoreError> {
        let state = self.read()?;
        let Some(user) = state
            .by_username
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned()
        else {
            return Ok(None);
        };
        let roles = roles_of(&state, user.id);
        Ok(Some(Principal::from_records(user, &roles)))
    }
}
