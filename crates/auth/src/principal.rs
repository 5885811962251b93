use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::{Role, RoleType, User};

/// An authenticated identity together with its typed authorities.
///
/// Built from a user and the role records read for that user. Role names the
/// registry does not know are dropped here, which leaves the decision to the
/// caller's deny-by-default checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user: User,
    pub authorities: Vec<RoleType>,
}

impl Principal {
    pub fn from_records(user: User, roles: &[Role]) -> Self {
        let mut authorities = Vec::with_capacity(roles.len());
        for role in roles {
            if role.user_id != user.id {
                tracing::warn!(
                    role_id = %role.id,
                    role_user_id = %role.user_id,
                    user_id = %user.id,
                    "ignoring role assigned to a different user"
                );
                continue;
            }
            match role.role_type() {
                Some(kind) => authorities.push(kind),
                None => tracing::warn!(
                    role_id = %role.id,
                    role_name = %role.name,
                    "ignoring unknown role name"
                ),
            }
        }
        authorities.sort();
        authorities.dedup();

        Self { user, authorities }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn username(&self) -> &str {
        self.user.username.as_str()
    }

    pub fn has_role(&self, role: RoleType) -> bool {
        self.authorities.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(RoleType::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Username;
    use warden_core::RoleId;

    fn alice() -> User {
        User::new(UserId::new(1), Username::parse("alice").unwrap())
    }

    #[test]
    fn translates_stored_names_into_authorities() {
        let roles = vec![Role::new(RoleId::new(10), UserId::new(1), "ROLE_ADMIN")];
        let principal = Principal::from_records(alice(), &roles);

        assert_eq!(principal.authorities, vec![RoleType::Admin]);
        assert!(principal.is_admin());
        assert!(!principal.has_role(RoleType::User));
        assert_eq!(principal.username(), "alice");
    }

    #[test]
    fn skips_unknown_names_and_duplicates() {
        let roles = vec![
            Role::new(RoleId::new(10), UserId::new(1), "ROLE_USER"),
            Role::new(RoleId::new(11), UserId::new(1), "ROLE_GUEST"),
            Role::new(RoleId::new(12), UserId::new(1), "ROLE_USER"),
        ];
        let principal = Principal::from_records(alice(), &roles);

        assert_eq!(principal.authorities, vec![RoleType::User]);
    }

    #[test]
    fn ignores_roles_of_other_users() {
        let roles = vec![Role::new(RoleId::new(20), UserId::new(2), "ROLE_ADMIN")];
        let principal = Principal::from_records(alice(), &roles);

        assert!(principal.authorities.is_empty());
    }

    #[test]
    fn no_roles_means_no_authorities() {
        let principal = Principal::from_records(alice(), &[]);
        assert!(principal.authorities.is_empty());
        assert_eq!(principal.user_id(), UserId::new(1));
    }
}
