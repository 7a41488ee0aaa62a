//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod shared_actor_source;
mod static_policy_source;

pub use shared_actor_source::SharedActorSource;
pub use static_policy_source::StaticPolicySource;
