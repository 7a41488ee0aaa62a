use branchgate_application::ActorSource;
use branchgate_core::UserIdentity;
use branchgate_domain::{Actor, BranchRoles};
use parking_lot::RwLock;
use tracing::debug;

/// Actor cell written by the auth collaborator and read by the policy engine.
#[derive(Debug, Default)]
pub struct SharedActorSource {
    actor: RwLock<Actor>,
}

impl SharedActorSource {
    /// Creates a cell holding `actor`.
    #[must_use]
    pub fn new(actor: Actor) -> Self {
        Self {
            actor: RwLock::new(actor),
        }
    }

    /// Commits a new actor and returns the previous one.
    pub fn replace(&self, actor: Actor) -> Actor {
        let previous = std::mem::replace(&mut *self.actor.write(), actor);
        if previous.key() != actor.key() {
            debug!(
                target: "branchgate::session",
                from = previous.role().map(|role| role.as_str()).unwrap_or("none"),
                to = actor.role().map(|role| role.as_str()).unwrap_or("none"),
                "session actor changed"
            );
        }

        previous
    }

    /// Commits the actor resolved from a session identity and its branch roles.
    pub fn sync_with_session(&self, identity: Option<&UserIdentity>, roles: &BranchRoles) -> Actor {
        let actor = Actor::resolve(identity, roles);
        self.replace(actor);
        actor
    }

    /// Clears the actor on logout.
    pub fn sign_out(&self) {
        self.replace(Actor::anonymous());
    }
}

impl ActorSource for SharedActorSource {
    fn current_actor(&self) -> Actor {
        *self.actor.read()
    }
}
