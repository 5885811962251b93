use thiserror::Error;

use crate::{Principal, RoleType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No authenticated principal is bound to the current request.
    #[error("security context not found")]
    SecurityContextNotFound,

    #[error("forbidden: missing role '{0}'")]
    Forbidden(RoleType),
}

/// Require that the principal of the current security context holds `required`.
///
/// - No IO
/// - No panics
/// - No role hierarchy: `ROLE_ADMIN` does not imply `ROLE_USER`
pub fn require_role(principal: Option<&Principal>, required: RoleType) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::SecurityContextNotFound)?;

    if principal.has_role(required) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %principal.user_id(),
            required = %required,
            "role check denied"
        );
        Err(AuthzError::Forbidden(required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, User, Username};
    use warden_core::{RoleId, UserId};

    fn principal_with(names: &[&str]) -> Principal {
        let user = User::new(UserId::new(1), Username::parse("alice").unwrap());
        let roles: Vec<Role> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Role::new(RoleId::new(i as i64), UserId::new(1), *name))
            .collect();
        Principal::from_records(user, &roles)
    }

    #[test]
    fn missing_context_is_reported() {
        assert_eq!(
            require_role(None, RoleType::User),
            Err(AuthzError::SecurityContextNotFound)
        );
    }

    #[test]
    fn granted_role_passes() {
        let principal = principal_with(&["ROLE_USER"]);
        assert_eq!(require_role(Some(&principal), RoleType::User), Ok(()));
    }

    #[test]
    fn admin_does_not_imply_user() {
        let principal = principal_with(&["ROLE_ADMIN"]);
        assert_eq!(
            require_role(Some(&principal), RoleType::User),
            Err(AuthzError::Forbidden(RoleType::User))
        );
    }

    #[test]
    fn unknown_role_names_grant_nothing() {
        let principal = principal_with(&["ROLE_GUEST"]);
        assert!(require_role(Some(&principal), RoleType::Admin).is_err());
    }
}
