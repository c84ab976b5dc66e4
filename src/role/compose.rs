// ABOUTME: Boolean role composition - all_of, any_of, and not_of build
// ABOUTME: anonymous composite roles out of existing definitions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{Request, View};
use crate::error::{ConfigError, RolegateError};
use crate::permission::enforce::Enforcement;
use crate::permission::table::PermissionTable;
use crate::role::def::RoleDef;
use crate::role::traits::Role;

/// How a composite combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every child must hold.
    All,
    /// At least one child must hold.
    Any,
    /// The conjunction of the children must not hold.
    NotAll,
}

impl Combinator {
    fn label(self) -> &'static str {
        match self {
            Combinator::All => "all_of",
            Combinator::Any => "any_of",
            Combinator::NotAll => "not_of",
        }
    }
}

/// A role holding only when every child holds.
///
/// During checks every child is evaluated even after one has already
/// failed, so enforcement side effects of later children still run.
pub fn all_of(roles: impl IntoIterator<Item = RoleDef>) -> RoleDef {
    composed(Combinator::All, roles)
}

/// A role holding when at least one child holds.
///
/// Checks stop at the first child that grants; later children are not
/// evaluated and their enforcement never runs.
pub fn any_of(roles: impl IntoIterator<Item = RoleDef>) -> RoleDef {
    composed(Combinator::Any, roles)
}

/// A role holding when the children do not all hold together.
///
/// With a single child this is plain negation. Like [`all_of`], the
/// underlying conjunction evaluates every child.
pub fn not_of(roles: impl IntoIterator<Item = RoleDef>) -> RoleDef {
    composed(Combinator::NotAll, roles)
}

fn composed(op: Combinator, roles: impl IntoIterator<Item = RoleDef>) -> RoleDef {
    let children: Vec<RoleDef> = roles.into_iter().collect();
    let name = format!(
        "{}({})",
        op.label(),
        children
            .iter()
            .map(RoleDef::name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    RoleDef::composed(name, op, children)
}

pub(crate) fn instantiate(name: &str, op: Combinator, children: &[RoleDef]) -> Arc<dyn Role> {
    Arc::new(Composite {
        name: name.to_string(),
        op,
        children: children.iter().map(RoleDef::instantiate).collect(),
    })
}

struct Composite {
    name: String,
    op: Combinator,
    children: Vec<Arc<dyn Role>>,
}

impl Composite {
    async fn check_all(
        &self,
        request: &Request,
        view: &View,
        enforcement: &Enforcement,
    ) -> Result<bool, RolegateError> {
        let mut granted = true;
        for child in &self.children {
            granted &= child.check(request, view, enforcement).await?;
        }
        Ok(granted)
    }
}

#[async_trait]
impl Role for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self, request: &Request, view: &View) -> bool {
        match self.op {
            Combinator::All => self.children.iter().all(|c| c.is_active(request, view)),
            Combinator::Any => self.children.iter().any(|c| c.is_active(request, view)),
            Combinator::NotAll => !self.children.iter().all(|c| c.is_active(request, view)),
        }
    }

    /// Composites have no table of their own; asking for one is a
    /// configuration mistake, not a denial.
    fn permissions(
        &self,
        _request: &Request,
        _view: &View,
    ) -> Result<PermissionTable, ConfigError> {
        Err(ConfigError::ComposedPermissions {
            role: self.name.clone(),
        })
    }

    async fn check(
        &self,
        request: &Request,
        view: &View,
        enforcement: &Enforcement,
    ) -> Result<bool, RolegateError> {
        match self.op {
            Combinator::All => self.check_all(request, view, enforcement).await,
            Combinator::Any => {
                for child in &self.children {
                    if child.check(request, view, enforcement).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Combinator::NotAll => Ok(!self.check_all(request, view, enforcement).await?),
        }
    }
}
