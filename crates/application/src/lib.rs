//! Application services and ports of the branch policy engine.

#![forbid(unsafe_code)]

mod actor_bound_policy;
mod policy_evaluator;
mod policy_ports;

pub use actor_bound_policy::ActorBoundPolicy;
pub use policy_evaluator::{CapabilitySnapshot, PolicyEvaluator};
pub use policy_ports::{ActorSource, PolicySource, TabDescriptor};
