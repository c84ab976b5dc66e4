// ABOUTME: Enforcement hooks - collaborator traits that apply a grant's
// ABOUTME: field list and row restriction to the surrounding framework.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{Request, View};
use crate::error::EnforceError;
use crate::permission::grant::{FieldSet, Restriction};

/// Applies a grant's field list to the response serialization layer.
///
/// Implementations typically narrow a serializer or projection to the
/// granted fields. Returning an error aborts the check that invoked it.
#[async_trait]
pub trait FieldEnforcer: Send + Sync {
    async fn enforce_fields(
        &self,
        request: &Request,
        view: &View,
        fields: &FieldSet,
    ) -> Result<(), anyhow::Error>;
}

/// Applies a grant's row-level restriction to the data access layer.
///
/// Invoked for every matched grant, with `None` when the grant carries no
/// restriction, so implementations can also reset any ambient filter.
#[async_trait]
pub trait RestrictionEnforcer: Send + Sync {
    async fn enforce_restrictions(
        &self,
        request: &Request,
        view: &View,
        restriction: Option<&Restriction>,
    ) -> Result<(), anyhow::Error>;
}

/// Enforcer that accepts every grant without side effects.
pub struct NoEnforcement;

#[async_trait]
impl FieldEnforcer for NoEnforcement {
    async fn enforce_fields(
        &self,
        _request: &Request,
        _view: &View,
        _fields: &FieldSet,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

#[async_trait]
impl RestrictionEnforcer for NoEnforcement {
    async fn enforce_restrictions(
        &self,
        _request: &Request,
        _view: &View,
        _restriction: Option<&Restriction>,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

/// The enforcer pair handed to every permission check.
#[derive(Clone)]
pub struct Enforcement {
    fields: Arc<dyn FieldEnforcer>,
    restrictions: Arc<dyn RestrictionEnforcer>,
}

impl Enforcement {
    pub fn new(fields: Arc<dyn FieldEnforcer>, restrictions: Arc<dyn RestrictionEnforcer>) -> Self {
        Self {
            fields,
            restrictions,
        }
    }

    /// An enforcement pair with no side effects, for setups that only
    /// need the allow/deny answer.
    pub fn noop() -> Self {
        Self::new(Arc::new(NoEnforcement), Arc::new(NoEnforcement))
    }

    pub fn with_fields(mut self, enforcer: Arc<dyn FieldEnforcer>) -> Self {
        self.fields = enforcer;
        self
    }

    pub fn with_restrictions(mut self, enforcer: Arc<dyn RestrictionEnforcer>) -> Self {
        self.restrictions = enforcer;
        self
    }

    /// Runs the field enforcer, tagging any failure with its phase.
    pub async fn apply_fields(
        &self,
        request: &Request,
        view: &View,
        fields: &FieldSet,
    ) -> Result<(), EnforceError> {
        self.fields
            .enforce_fields(request, view, fields)
            .await
            .map_err(EnforceError::Fields)
    }

    /// Runs the restriction enforcer, tagging any failure with its phase.
    pub async fn apply_restrictions(
        &self,
        request: &Request,
        view: &View,
        restriction: Option<&Restriction>,
    ) -> Result<(), EnforceError> {
        self.restrictions
            .enforce_restrictions(request, view, restriction)
            .await
            .map_err(EnforceError::Restrictions)
    }
}

impl Default for Enforcement {
    fn default() -> Self {
        Self::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Method;

    struct Failing;

    #[async_trait]
    impl FieldEnforcer for Failing {
        async fn enforce_fields(
            &self,
            _request: &Request,
            _view: &View,
            _fields: &FieldSet,
        ) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("serializer rejected field list"))
        }
    }

    #[async_trait]
    impl RestrictionEnforcer for Failing {
        async fn enforce_restrictions(
            &self,
            _request: &Request,
            _view: &View,
            _restriction: Option<&Restriction>,
        ) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("queryset unavailable"))
        }
    }

    #[tokio::test]
    async fn test_noop_enforcement_accepts() {
        let enforcement = Enforcement::noop();
        let request = Request::new(Method::Get);
        let view = View::item("cats");

        enforcement
            .apply_fields(&request, &view, &FieldSet::All)
            .await
            .unwrap();
        enforcement
            .apply_restrictions(&request, &view, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_tagged_by_phase() {
        let enforcement = Enforcement::noop()
            .with_fields(Arc::new(Failing))
            .with_restrictions(Arc::new(Failing));
        let request = Request::new(Method::Get);
        let view = View::item("cats");

        let err = enforcement
            .apply_fields(&request, &view, &FieldSet::All)
            .await
            .unwrap_err();
        assert!(matches!(err, EnforceError::Fields(_)));
        assert!(err.to_string().contains("field enforcement failed"));

        let err = enforcement
            .apply_restrictions(&request, &view, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EnforceError::Restrictions(_)));
    }
}
