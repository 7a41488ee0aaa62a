//! Domain entities and invariants of the branch policy engine.

#![forbid(unsafe_code)]

mod actor;
mod policy;
mod security;

pub use actor::{Actor, ActorKey, BranchRoles};
pub use policy::{ConfigurationGap, Dimension, DimensionKey, PermissionEntry, PolicyConfig};
pub use security::{ActionType, Role, UiComponentType};
