// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use rolegate::prelude::*;` to get started quickly.

pub use crate::authorizer::Authorizer;
pub use crate::context::{Action, Identity, Method, Request, View, ViewKind};
pub use crate::error::{ConfigError, EnforceError, RolegateError};
pub use crate::permission::{
    ActionSelector, ActionTable, Enforcement, FieldEnforcer, FieldSet, Grant, NoEnforcement,
    PermissionTable, Restriction, RestrictionEnforcer, ViewSelector,
};
pub use crate::role::{Combinator, Role, RoleDef, RoleRegistry, all_of, any_of, not_of};
