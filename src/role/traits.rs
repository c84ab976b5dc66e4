// ABOUTME: The Role trait - activation, permission tables, and the default
// ABOUTME: check that resolves a grant and runs enforcement.

use async_trait::async_trait;
use tracing::debug;

use crate::context::{Action, Request, View};
use crate::error::{ConfigError, RolegateError};
use crate::permission::enforce::Enforcement;
use crate::permission::table::PermissionTable;

/// A role a request can hold.
///
/// Implementations answer two questions: does this request hold the role
/// ([`Role::is_active`]), and what does the role allow
/// ([`Role::permissions`]). The provided [`Role::check`] combines them
/// into the grant-or-deny decision.
///
/// One instance is created per request per authorization pass, so
/// implementations may cache per-request state in `&mut self`-free form
/// but must not assume reuse across requests.
#[async_trait]
pub trait Role: Send + Sync {
    /// Stable name, matching the name the role was registered under.
    fn name(&self) -> &str;

    /// Whether the request holds this role for the given view.
    fn is_active(&self, request: &Request, view: &View) -> bool;

    /// The role's permission table for this request and view.
    ///
    /// Rebuilt per check, so tables may depend on the request. Composed
    /// roles have no table of their own and return
    /// [`ConfigError::ComposedPermissions`].
    fn permissions(&self, request: &Request, view: &View) -> Result<PermissionTable, ConfigError>;

    /// The action the request performs against the view.
    ///
    /// Defaults to [`Action::infer`]; override for views with a custom
    /// action vocabulary.
    fn action(&self, request: &Request, view: &View) -> Action {
        Action::infer(request.method, view.kind)
    }

    /// Resolves a grant for the request and applies enforcement.
    ///
    /// Returns `Ok(false)` when the table has no matching entry. A
    /// matching grant runs field enforcement, then restriction
    /// enforcement; either failing aborts the check with an error rather
    /// than a denial.
    async fn check(
        &self,
        request: &Request,
        view: &View,
        enforcement: &Enforcement,
    ) -> Result<bool, RolegateError> {
        let action = self.action(request, view);
        let table = self.permissions(request, view)?;

        match table.resolve(view, action)? {
            Some(grant) => {
                enforcement.apply_fields(request, view, &grant.fields).await?;
                enforcement
                    .apply_restrictions(request, view, grant.restriction.as_ref())
                    .await?;
                debug!(
                    role = self.name(),
                    view = %view.name,
                    action = %action,
                    "grant applied"
                );
                Ok(true)
            }
            None => {
                debug!(
                    role = self.name(),
                    view = %view.name,
                    action = %action,
                    "no grant"
                );
                Ok(false)
            }
        }
    }
}
