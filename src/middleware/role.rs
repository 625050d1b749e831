//! Role-based authorization helpers.
//!
//! The JWT carries the user's role as a string; controllers parse it and
//! gate operations with [`check_role`] / [`check_any_role`]. The role
//! hierarchy is admin > teacher > student.

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// Check that the authenticated user holds exactly the given role.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_role(&auth_user, UserRole::Admin)?;
///     // Handler logic
/// }
/// ```
pub fn check_role(auth_user: &AuthUser, required_role: UserRole) -> Result<(), AppError> {
    let user_role = parse_role_from_string(&auth_user.0.role)?;

    if user_role != required_role {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {:?}, but user has role: {:?}",
            required_role, user_role
        )));
    }

    Ok(())
}

/// Check that the authenticated user holds one of the given roles.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let user_role = parse_role_from_string(&auth_user.0.role)?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

/// Parse a role string into a [`UserRole`].
///
/// An unknown role string means a token we issued carries a role the
/// system doesn't know, which is an internal error rather than a client
/// mistake.
pub fn parse_role_from_string(role_str: &str) -> Result<UserRole, AppError> {
    match role_str {
        "admin" => Ok(UserRole::Admin),
        "teacher" => Ok(UserRole::Teacher),
        "student" => Ok(UserRole::Student),
        _ => Err(AppError::internal_error(format!(
            "Invalid role: {}",
            role_str
        ))),
    }
}

/// Get the hierarchy level of a role (higher number = more privileges)
pub fn role_hierarchy_level(role: &UserRole) -> u8 {
    match role {
        UserRole::Admin => 2,
        UserRole::Teacher => 1,
        UserRole::Student => 0,
    }
}

/// Check if a role has at least the specified level of access
pub fn check_role_hierarchy(
    user_role: &UserRole,
    minimum_required_role: &UserRole,
) -> Result<(), AppError> {
    if role_hierarchy_level(user_role) < role_hierarchy_level(minimum_required_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Minimum required role: {:?}, but user has role: {:?}",
            minimum_required_role, user_role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert_eq!(role_hierarchy_level(&UserRole::Admin), 2);
        assert_eq!(role_hierarchy_level(&UserRole::Teacher), 1);
        assert_eq!(role_hierarchy_level(&UserRole::Student), 0);
    }

    #[test]
    fn test_parse_role_from_string() {
        assert!(matches!(
            parse_role_from_string("admin"),
            Ok(UserRole::Admin)
        ));
        assert!(matches!(
            parse_role_from_string("teacher"),
            Ok(UserRole::Teacher)
        ));
        assert!(matches!(
            parse_role_from_string("student"),
            Ok(UserRole::Student)
        ));
        assert!(parse_role_from_string("invalid").is_err());
    }
}
