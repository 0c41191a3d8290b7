//! Tenant authorization for authenticated callers.
//!
//! One decision function serves every resource. Resources differ only in
//! which tenant identifiers they require, expressed as a [`ResourceScope`].

use super::{AuthClaims, UserType};
use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{ErrorKind, Result};

/// Tenant identifiers a resource is scoped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// Projects and events: only the project must match.
    ProjectOnly,
    /// Guests: both the project and the event must match.
    ProjectAndEvent,
}

/// Authorization decisions over a caller's claims.
pub trait AuthProvider {
    /// Returns the claims the decisions are made on.
    fn claims(&self) -> &AuthClaims;

    /// Authorizes access to a tenant-scoped resource.
    ///
    /// `SYSTEM_ADMIN` is always allowed. `PROJECT_USER` is allowed only when
    /// every identifier the scope requires equals the stringified claim
    /// exactly. Any other role is denied.
    fn authorize(
        &self,
        scope: ResourceScope,
        project_id: &str,
        event_id: Option<&str>,
    ) -> Result<()> {
        let claims = self.claims();

        let denial = match &claims.user_type {
            UserType::SystemAdmin => return Ok(()),
            UserType::ProjectUser => project_user_denial(claims, scope, project_id, event_id),
            UserType::Unrecognized(_) => Some("unrecognized user type"),
        };

        let Some(reason) = denial else {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = claims.user_id,
                project_id,
                event_id,
                ?scope,
                "access granted"
            );
            return Ok(());
        };

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = claims.user_id,
            user_type = %claims.user_type,
            project_id,
            event_id,
            ?scope,
            reason,
            "access denied"
        );

        Err(ErrorKind::Forbidden
            .with_message("permission denied")
            .with_context(reason))
    }

    /// Returns the project a listing must be restricted to.
    ///
    /// `SYSTEM_ADMIN` sees every project (`None`), `PROJECT_USER` only its
    /// own. Any other role is denied.
    fn project_scope(&self) -> Result<Option<i64>> {
        let claims = self.claims();
        match &claims.user_type {
            UserType::SystemAdmin => Ok(None),
            UserType::ProjectUser => Ok(Some(claims.project_id)),
            UserType::Unrecognized(_) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHORIZATION,
                    user_id = claims.user_id,
                    user_type = %claims.user_type,
                    "access denied: unrecognized user type"
                );

                Err(ErrorKind::Forbidden
                    .with_message("permission denied")
                    .with_context("unrecognized user type"))
            }
        }
    }

    /// Authorizes system-wide operations reserved for `SYSTEM_ADMIN`.
    fn authorize_admin(&self) -> Result<()> {
        let claims = self.claims();
        if claims.user_type == UserType::SystemAdmin {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = claims.user_id,
            user_type = %claims.user_type,
            "access denied: administrator required"
        );

        Err(ErrorKind::Forbidden
            .with_message("permission denied")
            .with_context("administrator required"))
    }
}

impl AuthProvider for AuthClaims {
    #[inline]
    fn claims(&self) -> &AuthClaims {
        self
    }
}

fn project_user_denial(
    claims: &AuthClaims,
    scope: ResourceScope,
    project_id: &str,
    event_id: Option<&str>,
) -> Option<&'static str> {
    if project_id != claims.project_id.to_string() {
        return Some("project does not match");
    }

    match (scope, event_id) {
        (ResourceScope::ProjectOnly, _) => None,
        (ResourceScope::ProjectAndEvent, None) => Some("event is required"),
        (ResourceScope::ProjectAndEvent, Some(event_id)) => {
            (event_id != claims.event_id.to_string()).then_some("event does not match")
        }
    }
}

/// Authorization checks with `?` propagation.
///
/// - `authorize!(project: auth_state, project_id)`
/// - `authorize!(event: auth_state, project_id, event_id)`
/// - `authorize!(admin: auth_state)`
#[macro_export]
macro_rules! authorize {
    (project: $auth_state:expr, $project_id:expr $(,)?) => {
        $crate::extract::AuthProvider::authorize(
            &$auth_state,
            $crate::extract::ResourceScope::ProjectOnly,
            $project_id,
            None,
        )?
    };

    (event: $auth_state:expr, $project_id:expr, $event_id:expr $(,)?) => {
        $crate::extract::AuthProvider::authorize(
            &$auth_state,
            $crate::extract::ResourceScope::ProjectAndEvent,
            $project_id,
            Some($event_id),
        )?
    };

    (admin: $auth_state:expr $(,)?) => {
        $crate::extract::AuthProvider::authorize_admin(&$auth_state)?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Error;

    fn claims(user_type: UserType) -> AuthClaims {
        AuthClaims {
            username: "ann".into(),
            name: "Ann".into(),
            user_id: 11,
            project_id: 7,
            event_id: 3,
            user_type,
        }
    }

    fn denied(result: Result<()>) -> bool {
        matches!(result, Err(ref error) if error.kind() == ErrorKind::Forbidden)
    }

    #[test]
    fn admin_is_allowed_everywhere() {
        let admin = claims(UserType::SystemAdmin);

        for project in ["7", "8", "0", "not-a-number"] {
            assert!(admin.authorize(ResourceScope::ProjectOnly, project, None).is_ok());
            assert!(
                admin
                    .authorize(ResourceScope::ProjectAndEvent, project, Some("99"))
                    .is_ok()
            );
            assert!(admin.authorize(ResourceScope::ProjectAndEvent, project, None).is_ok());
        }
        assert!(admin.authorize_admin().is_ok());
    }

    #[test]
    fn project_user_matches_own_project() {
        let user = claims(UserType::ProjectUser);

        assert!(user.authorize(ResourceScope::ProjectOnly, "7", None).is_ok());
        assert!(user.authorize(ResourceScope::ProjectOnly, "7", Some("99")).is_ok());
        assert!(denied(user.authorize(ResourceScope::ProjectOnly, "8", None)));
    }

    #[test]
    fn project_user_requires_exact_strings() {
        let user = claims(UserType::ProjectUser);

        assert!(denied(user.authorize(ResourceScope::ProjectOnly, "07", None)));
        assert!(denied(user.authorize(ResourceScope::ProjectOnly, " 7", None)));
        assert!(denied(user.authorize(ResourceScope::ProjectOnly, "+7", None)));
    }

    #[test]
    fn project_user_event_scope() {
        let user = claims(UserType::ProjectUser);

        assert!(user.authorize(ResourceScope::ProjectAndEvent, "7", Some("3")).is_ok());
        assert!(denied(user.authorize(ResourceScope::ProjectAndEvent, "7", Some("4"))));
        assert!(denied(user.authorize(ResourceScope::ProjectAndEvent, "8", Some("3"))));
        assert!(denied(user.authorize(ResourceScope::ProjectAndEvent, "7", None)));
    }

    #[test]
    fn unknown_roles_are_denied() {
        for user_type in [
            UserType::Unrecognized("GUEST".into()),
            UserType::Unrecognized(String::new()),
        ] {
            let user = claims(user_type);
            assert!(denied(user.authorize(ResourceScope::ProjectOnly, "7", None)));
            assert!(denied(user.authorize(ResourceScope::ProjectAndEvent, "7", Some("3"))));
            assert!(denied(user.authorize_admin()));
        }
    }

    #[test]
    fn listing_scope_follows_role() {
        assert_eq!(claims(UserType::SystemAdmin).project_scope().unwrap(), None);
        assert_eq!(claims(UserType::ProjectUser).project_scope().unwrap(), Some(7));

        let error = claims(UserType::Unrecognized("GUEST".into()))
            .project_scope()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(error.to_response().message, "permission denied");
    }

    #[test]
    fn project_user_is_not_admin() {
        assert!(denied(claims(UserType::ProjectUser).authorize_admin()));
    }

    #[test]
    fn event_detail_across_projects() {
        let user = claims(UserType::ProjectUser);

        let allowed: Result<()> = (|| {
            authorize!(project: user, "7");
            Ok(())
        })();
        assert!(allowed.is_ok());

        let other: Result<()> = (|| {
            authorize!(project: user, "8");
            Ok(())
        })();
        let error: Error = other.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(error.to_response().message, "permission denied");
    }
}
