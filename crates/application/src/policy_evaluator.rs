use std::sync::Arc;

use branchgate_core::AppResult;
use branchgate_domain::{ActionType, Actor, DimensionKey, PolicyConfig, UiComponentType};
use tracing::{debug, info, warn};

use crate::{PolicySource, TabDescriptor};

mod capabilities;
mod surfaces;


pub use capabilities::CapabilitySnapshot;

/// Answers permission queries for an explicit actor against the policy table.
///
/// Every query is total and fails closed: an actor without a role, an unknown
/// resource, a missing entry, or an entry with no roles all deny.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    config: Arc<PolicyConfig>,
}

impl PolicyEvaluator {
    /// Creates an evaluator over a loaded policy table.
    #[must_use]
    pub fn new(config: Arc<PolicyConfig>) -> Self {
        Self { config }
    }

    /// Loads the policy table from a source and reports its gaps.
    pub fn from_source(source: &dyn PolicySource) -> AppResult<Self> {
        let config = source.load()?;

        let gaps = config.configuration_gaps();
        for gap in &gaps {
            warn!(
                target: "branchgate::policy",
                resource = gap.resource.as_str(),
                action = gap.action.as_str(),
                "action has no policy entry and will be denied"
            );
        }
        info!(
            target: "branchgate::policy",
            version = config.version(),
            resources = config.resources().len(),
            gaps = gaps.len(),
            "policy table loaded"
        );

        Ok(Self::new(Arc::new(config)))
    }

    /// Returns the policy table.
    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns whether the actor may perform `action` on `resource`.
    #[must_use]
    pub fn can_perform_action(&self, actor: &Actor, resource: &str, action: ActionType) -> bool {
        self.allows(actor, resource, DimensionKey::Action(action))
    }

    /// Returns whether the actor may see one UI component of `resource`.
    #[must_use]
    pub fn can_view_ui_component(
        &self,
        actor: &Actor,
        resource: &str,
        component_type: UiComponentType,
        component_id: &str,
    ) -> bool {
        self.allows(
            actor,
            resource,
            DimensionKey::Component(component_type, component_id),
        )
    }

    /// Returns whether the actor may create records of `resource`.
    #[must_use]
    pub fn can_create(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::Create)
    }

    /// Returns whether the actor may edit records of `resource`.
    #[must_use]
    pub fn can_edit(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::Edit)
    }

    /// Returns whether the actor may delete records of `resource`.
    #[must_use]
    pub fn can_delete(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::Delete)
    }

    /// Returns whether the actor may view records of `resource`.
    #[must_use]
    pub fn can_view(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::View)
    }

    /// Returns whether the actor may export records of `resource`.
    #[must_use]
    pub fn can_export(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::Export)
    }

    /// Returns whether the actor may import records of `resource`.
    #[must_use]
    pub fn can_import(&self, actor: &Actor, resource: &str) -> bool {
        self.can_perform_action(actor, resource, ActionType::Import)
    }

    /// Filters caller-supplied tabs to the permitted ones, keeping the
    /// caller's order rather than the declaration order.
    #[must_use]
    pub fn filter_tabs_by_permission<T>(&self, actor: &Actor, resource: &str, tabs: Vec<T>) -> Vec<T>
    where
        T: TabDescriptor,
    {
        tabs.into_iter()
            .filter(|tab| {
                self.can_view_ui_component(actor, resource, UiComponentType::Tab, tab.value())
            })
            .collect()
    }

    fn allows(&self, actor: &Actor, resource: &str, key: DimensionKey<'_>) -> bool {
        match self.config.lookup(resource, key) {
            None => {
                warn!(
                    target: "branchgate::policy",
                    resource,
                    dimension = %key,
                    "no policy entry configured; denying"
                );
                false
            }
            Some([]) => {
                debug!(
                    target: "branchgate::policy",
                    resource,
                    dimension = %key,
                    "policy entry grants nobody"
                );
                false
            }
            Some(roles) => actor.role().is_some_and(|role| roles.contains(&role)),
        }
    }
}
