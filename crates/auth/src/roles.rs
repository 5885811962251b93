use serde::{Deserialize, Serialize};

use warden_core::{RoleId, UserId};

use crate::RoleType;

/// Role assignment record linking a user to a stored role name.
///
/// The name is kept as stored; translation into a typed authority happens via
/// [`Role::role_type`] so unknown names survive the read and can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub user_id: UserId,
    pub name: String,
}

impl Role {
    pub fn new(id: RoleId, user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
        }
    }

    pub fn role_type(&self) -> Option<RoleType> {
        RoleType::find_by_type(&self.name)
    }
}
