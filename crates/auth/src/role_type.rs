//! Closed registry of role names known to the security layer.

use serde::{Deserialize, Serialize};

/// A typed authority.
///
/// The set is fixed at build time. Stored role names are translated with
/// [`RoleType::find_by_type`]; anything outside the set resolves to `None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleType {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_USER")]
    User,
}

impl RoleType {
    pub const ALL: [RoleType; 2] = [RoleType::Admin, RoleType::User];

    /// Canonical stored name (e.g. `"ROLE_ADMIN"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoleType::Admin => "ROLE_ADMIN",
            RoleType::User => "ROLE_USER",
        }
    }

    /// Look up a variant by its canonical name.
    ///
    /// Exact, case-sensitive match. Unknown input yields `None` so callers can
    /// apply their own deny/default policy.
    pub fn find_by_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl core::fmt::Display for RoleType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(RoleType::find_by_type("ROLE_ADMIN"), Some(RoleType::Admin));
        assert_eq!(RoleType::find_by_type("ROLE_USER"), Some(RoleType::User));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        for name in ["ROLE_GUEST", "", "role_admin", "ROLE_ADMIN ", "ADMIN"] {
            assert_eq!(RoleType::find_by_type(name), None, "{name:?}");
        }
    }

    #[test]
    fn display_matches_canonical_name() {
        for role in RoleType::ALL {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(RoleType::find_by_type(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn serde_uses_canonical_names() {
        assert_eq!(serde_json::to_string(&RoleType::Admin).unwrap(), "\"ROLE_ADMIN\"");
        let parsed: RoleType = serde_json::from_str("\"ROLE_USER\"").unwrap();
        assert_eq!(parsed, RoleType::User);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: lookup is total and only ever returns the variant whose
        /// canonical name equals the input.
        #[test]
        fn lookup_is_total_and_exact(name in ".{0,24}") {
            match RoleType::find_by_type(&name) {
                Some(role) => prop_assert_eq!(role.as_str(), name.as_str()),
                None => prop_assert!(RoleType::ALL.iter().all(|r| r.as_str() != name)),
            }
        }

        /// Property: repeated lookups agree.
        #[test]
        fn lookup_is_idempotent(name in "(ROLE_)?[A-Za-z_]{0,10}") {
            prop_assert_eq!(RoleType::find_by_type(&name), RoleType::find_by_type(&name));
        }
    }
}
