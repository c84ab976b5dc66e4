// ABOUTME: Role model - the Role trait, named definitions, boolean
// ABOUTME: composition, and the ordered registry.

pub mod compose;
pub mod def;
pub mod registry;
pub mod traits;


pub use compose::{Combinator, all_of, any_of, not_of};
pub use def::{BuildFn, RoleDef};
pub use registry::RoleRegistry;
pub use traits::Role;
