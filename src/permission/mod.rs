// ABOUTME: Permission model - grants, the tables that hold them, and the
// ABOUTME: enforcement hooks that apply them to the surrounding framework.

pub mod enforce;
pub mod grant;
pub mod table;


pub use enforce::{Enforcement, FieldEnforcer, NoEnforcement, RestrictionEnforcer};
pub use grant::{FieldSet, Grant, Restriction};
pub use table::{ActionSelector, ActionTable, PermissionTable, ViewSelector};
