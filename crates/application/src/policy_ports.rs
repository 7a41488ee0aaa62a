use std::sync::Arc;

use branchgate_core::AppResult;
use branchgate_domain::{Actor, PolicyConfig};

/// Port that produces the static policy table at startup.
pub trait PolicySource: Send + Sync {
    /// Builds the policy table. Called once per process.
    fn load(&self) -> AppResult<PolicyConfig>;
}

/// Port exposing the actor of the current session.
///
/// Read on every query and never stored by the policy engine, so a committed
/// role switch, branch switch, or logout is observed by the next query.
pub trait ActorSource: Send + Sync {
    /// Returns the actor as of now.
    fn current_actor(&self) -> Actor;
}

impl<T> ActorSource for Arc<T>
where
    T: ActorSource + ?Sized,
{
    fn current_actor(&self) -> Actor {
        self.as_ref().current_actor()
    }
}

/// Caller-supplied tab option whose `value` is the tab component id.
pub trait TabDescriptor {
    /// Returns the component id of the tab.
    fn value(&self) -> &str;
}

impl TabDescriptor for String {
    fn value(&self) -> &str {
        self.as_str()
    }
}

impl TabDescriptor for &str {
    fn value(&self) -> &str {
        self
    }
}
