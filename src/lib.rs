// ABOUTME: Root module for rolegate - role-based request authorization.
// ABOUTME: Declares the public modules and re-exports the top-level types.

pub mod authorizer;
pub mod context;
pub mod error;
pub mod permission;
pub mod prelude;
pub mod role;

pub use authorizer::Authorizer;
pub use error::RolegateError;
