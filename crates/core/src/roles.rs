//! Role names and the rules for who may manage whom.
//!
//! These must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`.

use crate::error::CoreError;

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_SUPERADMIN: &str = "SUPERADMIN";

/// All valid role names, lowest privilege first.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN, ROLE_SUPERADMIN];

pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// `ADMIN` and `SUPERADMIN` both reach the admin endpoints.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPERADMIN
}

pub fn is_superadmin(role: &str) -> bool {
    role == ROLE_SUPERADMIN
}

/// Validate a role name against the known set.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if !is_valid_role(role) {
        return Err(CoreError::Validation(format!(
            "Invalid role '{}'. Valid roles: {}",
            role,
            VALID_ROLES.join(", ")
        )));
    }
    Ok(())
}

/// Whether `actor_role` may edit or delete an account currently holding
/// `target_role`. Plain admins manage only `USER` accounts.
pub fn can_manage(actor_role: &str, target_role: &str) -> bool {
    if is_superadmin(actor_role) {
        return true;
    }
    is_admin(actor_role) && target_role == ROLE_USER
}

/// Check a role change from `current` to `requested` performed by `actor_role`.
///
/// Only a superadmin may grant or revoke admin privileges.
pub fn check_role_change(
    actor_role: &str,
    current: &str,
    requested: &str,
) -> Result<(), CoreError> {
    validate_role(requested)?;

    if !is_admin(actor_role) {
        return Err(CoreError::Forbidden("Admin role required".into()));
    }
    if is_superadmin(actor_role) {
        return Ok(());
    }
    if is_admin(current) || is_admin(requested) {
        return Err(CoreError::Forbidden(
            "Only a superadmin can grant or revoke admin roles".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn admin_roles() {
        assert!(is_admin(ROLE_ADMIN));
        assert!(is_admin(ROLE_SUPERADMIN));
        assert!(!is_admin(ROLE_USER));
        assert!(!is_admin("admin"));
    }

    #[test]
    fn unknown_role_rejected() {
        assert_matches!(validate_role("OWNER"), Err(CoreError::Validation(_)));
        assert!(validate_role(ROLE_USER).is_ok());
    }

    #[test]
    fn admin_manages_only_users() {
        assert!(can_manage(ROLE_ADMIN, ROLE_USER));
        assert!(!can_manage(ROLE_ADMIN, ROLE_ADMIN));
        assert!(!can_manage(ROLE_ADMIN, ROLE_SUPERADMIN));
        assert!(can_manage(ROLE_SUPERADMIN, ROLE_ADMIN));
        assert!(!can_manage(ROLE_USER, ROLE_USER));
    }

    #[test]
    fn admin_cannot_promote() {
        assert_matches!(
            check_role_change(ROLE_ADMIN, ROLE_USER, ROLE_ADMIN),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            check_role_change(ROLE_ADMIN, ROLE_ADMIN, ROLE_USER),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn superadmin_can_promote() {
        assert!(check_role_change(ROLE_SUPERADMIN, ROLE_USER, ROLE_ADMIN).is_ok());
        assert!(check_role_change(ROLE_SUPERADMIN, ROLE_ADMIN, ROLE_SUPERADMIN).is_ok());
    }

    #[test]
    fn user_cannot_change_roles() {
        assert_matches!(
            check_role_change(ROLE_USER, ROLE_USER, ROLE_USER),
            Err(CoreError::Forbidden(_))
        );
    }
}
