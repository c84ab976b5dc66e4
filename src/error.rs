// ABOUTME: Defines all error types for the rolegate library using thiserror.
// ABOUTME: Configuration and enforcement errors, unified under RolegateError.

/// Top-level error type for the rolegate library.
///
/// A permission denial is never an error: `check` and `authorize` report it
/// as `Ok(false)`. An `Err` means the role tables are malformed or an
/// enforcement collaborator failed, and hosts should surface it as an
/// internal failure rather than an access-denied response.
#[derive(Debug, thiserror::Error)]
pub enum RolegateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("enforcement error: {0}")]
    Enforce(#[from] EnforceError),
}

/// Programmer errors in role authorship.
///
/// These propagate uncaught so a malformed permission table fails loudly
/// during development instead of silently denying access.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("permission table mixes the all-views wildcard with specific view entries")]
    MixedViewWildcard,

    #[error("action table for view '{view}' mixes the all-actions wildcard with specific actions")]
    MixedActionWildcard { view: String },

    #[error("composed role '{role}' has no permission table of its own")]
    ComposedPermissions { role: String },
}

/// Errors from enforcement collaborators.
#[derive(Debug, thiserror::Error)]
pub enum EnforceError {
    #[error("field enforcement failed: {0}")]
    Fields(#[source] anyhow::Error),

    #[error("restriction enforcement failed: {0}")]
    Restrictions(#[source] anyhow::Error),
}
