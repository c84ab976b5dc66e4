// ABOUTME: Role definitions - named factories the registry holds, building
// ABOUTME: a fresh role instance for every authorization pass.

use std::fmt;
use std::sync::Arc;

use crate::role::compose::{self, Combinator};
use crate::role::traits::Role;

/// Factory producing one role instance per authorization pass.
pub type BuildFn = Arc<dyn Fn() -> Arc<dyn Role> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum DefKind {
    Single(BuildFn),
    Composed {
        op: Combinator,
        children: Vec<RoleDef>,
    },
}

/// A named, registrable role definition.
///
/// Definitions are what the registry stores; the roles themselves are
/// built on demand so per-request state never leaks between checks.
/// Combinators ([`compose::all_of`] and friends) produce definitions
/// too, which keeps composition nestable.
#[derive(Clone)]
pub struct RoleDef {
    name: String,
    registrable: bool,
    kind: DefKind,
}

impl RoleDef {
    /// Defines a role under `name` with a factory for its instances.
    pub fn new(
        name: impl Into<String>,
        build: impl Fn() -> Arc<dyn Role> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            registrable: true,
            kind: DefKind::Single(Arc::new(build)),
        }
    }

    pub(crate) fn composed(name: String, op: Combinator, children: Vec<RoleDef>) -> Self {
        Self {
            name,
            registrable: false,
            kind: DefKind::Composed { op, children },
        }
    }

    /// Marks the definition as a building block the registry skips.
    ///
    /// Abstract bases and roles meant only for composition stay out of
    /// the authorization order this way.
    pub fn non_registrable(mut self) -> Self {
        self.registrable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registrable(&self) -> bool {
        self.registrable
    }

    /// Builds a fresh instance of the role.
    pub fn instantiate(&self) -> Arc<dyn Role> {
        match &self.kind {
            DefKind::Single(build) => build(),
            DefKind::Composed { op, children } => {
                compose::instantiate(&self.name, *op, children)
            }
        }
    }
}

impl fmt::Debug for RoleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleDef")
            .field("name", &self.name)
            .field("registrable", &self.registrable)
            .finish_non_exhaustive()
    }
}
