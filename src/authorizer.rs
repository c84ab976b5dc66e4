// ABOUTME: The authorizer - walks registered roles in order and grants the
// ABOUTME: request on the first active role whose check passes.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::context::{Request, View};
use crate::error::RolegateError;
use crate::permission::enforce::{Enforcement, FieldEnforcer, RestrictionEnforcer};
use crate::role::registry::RoleRegistry;

/// Decides whether a request may proceed against a view.
///
/// Roles are tried in registration order. The first one that is active
/// for the request and resolves a grant ends the pass; its enforcement
/// side effects are the ones that stick. Roles after it are never
/// evaluated.
#[derive(Clone)]
pub struct Authorizer {
    registry: RoleRegistry,
    enforcement: Enforcement,
}

impl Authorizer {
    /// An authorizer over `registry` with no-op enforcement.
    pub fn new(registry: RoleRegistry) -> Self {
        Self {
            registry,
            enforcement: Enforcement::noop(),
        }
    }

    pub fn with_field_enforcer(mut self, enforcer: Arc<dyn FieldEnforcer>) -> Self {
        self.enforcement = self.enforcement.with_fields(enforcer);
        self
    }

    pub fn with_restriction_enforcer(mut self, enforcer: Arc<dyn RestrictionEnforcer>) -> Self {
        self.enforcement = self.enforcement.with_restrictions(enforcer);
        self
    }

    pub fn with_enforcement(mut self, enforcement: Enforcement) -> Self {
        self.enforcement = enforcement;
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Runs the authorization pass for one request.
    ///
    /// `Ok(false)` means no active role granted access. Errors mean the
    /// pass could not be completed, either from a misconfigured table or
    /// a failing enforcement hook, and carry no allow/deny verdict.
    pub async fn authorize(&self, request: &Request, view: &View) -> Result<bool, RolegateError> {
        let defs = self.registry.all().await;
        trace!(view = %view.name, roles = defs.len(), "starting authorization pass");

        for def in defs {
            let role = def.instantiate();
            if !role.is_active(request, view) {
                trace!(role = def.name(), "role not active for request");
                continue;
            }
            if role.check(request, view, &self.enforcement).await? {
                debug!(role = def.name(), view = %view.name, "request authorized");
                return Ok(true);
            }
        }

        debug!(view = %view.name, "no active role granted access");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::*;
    use crate::context::Method;
    use crate::error::ConfigError;
    use crate::permission::table::PermissionTable;
    use crate::role::def::RoleDef;
    use crate::role::traits::Role;

    type CheckLog = Arc<RwLock<Vec<String>>>;

    struct Probe {
        name: &'static str,
        active: bool,
        grants: bool,
        log: CheckLog,
    }

    #[async_trait]
    impl Role for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn is_active(&self, _request: &Request, _view: &View) -> bool {
            self.active
        }

        fn permissions(
            &self,
            _request: &Request,
            _view: &View,
        ) -> Result<PermissionTable, ConfigError> {
            Ok(PermissionTable::new())
        }

        async fn check(
            &self,
            _request: &Request,
            _view: &View,
            _enforcement: &Enforcement,
        ) -> Result<bool, RolegateError> {
            self.log.write().await.push(self.name.to_string());
            Ok(self.grants)
        }
    }

    struct Misconfigured;

    impl Role for Misconfigured {
        fn name(&self) -> &str {
            "misconfigured"
        }

        fn is_active(&self, _request: &Request, _view: &View) -> bool {
            true
        }

        fn permissions(
            &self,
            _request: &Request,
            _view: &View,
        ) -> Result<PermissionTable, ConfigError> {
            Err(ConfigError::MixedViewWildcard)
        }
    }

    fn probe(name: &'static str, active: bool, grants: bool, log: &CheckLog) -> RoleDef {
        let log = log.clone();
        RoleDef::new(name, move || {
            Arc::new(Probe {
                name,
                active,
                grants,
                log: log.clone(),
            })
        })
    }

    #[tokio::test]
    async fn test_first_active_passing_role_wins() {
        let log = CheckLog::default();
        let registry = RoleRegistry::new();
        registry.register(probe("sleeping", false, true, &log)).await;
        registry.register(probe("refusing", true, false, &log)).await;
        registry.register(probe("granting", true, true, &log)).await;
        registry.register(probe("late", true, true, &log)).await;

        let authorizer = Authorizer::new(registry);
        let request = Request::new(Method::Get);
        let view = View::item("cats");

        assert!(authorizer.authorize(&request, &view).await.unwrap());
        // Inactive roles are never checked; roles after the grant never run.
        assert_eq!(*log.read().await, vec!["refusing", "granting"]);
    }

    #[tokio::test]
    async fn test_no_active_grant_denies() {
        let log = CheckLog::default();
        let registry = RoleRegistry::new();
        registry.register(probe("sleeping", false, true, &log)).await;
        registry.register(probe("refusing", true, false, &log)).await;

        let authorizer = Authorizer::new(registry);
        let request = Request::new(Method::Get);

        let allowed = authorizer
            .authorize(&request, &View::item("cats"))
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_empty_registry_denies() {
        let authorizer = Authorizer::new(RoleRegistry::new());
        let request = Request::new(Method::Get);

        let allowed = authorizer
            .authorize(&request, &View::collection("cats"))
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_config_error_halts_the_pass() {
        let log = CheckLog::default();
        let registry = RoleRegistry::new();
        registry
            .register(RoleDef::new("misconfigured", || Arc::new(Misconfigured)))
            .await;
        registry.register(probe("granting", true, true, &log)).await;

        let authorizer = Authorizer::new(registry);
        let request = Request::new(Method::Get);

        let err = authorizer
            .authorize(&request, &View::item("cats"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RolegateError::Config(ConfigError::MixedViewWildcard)
        ));
        // The pass stopped at the broken role; nothing after it ran.
        assert!(log.read().await.is_empty());
    }
}
