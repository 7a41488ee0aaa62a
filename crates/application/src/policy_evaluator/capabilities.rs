use super::surfaces::pick_default_tab;
use super::*;

/// Everything a page needs to render one resource for one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySnapshot {
    /// Resource name.
    pub resource: String,
    /// Permitted actions in canonical action order.
    pub actions: Vec<ActionType>,
    /// Visible tabs in declaration order.
    pub tabs: Vec<String>,
    /// Visible sections in declaration order.
    pub sections: Vec<String>,
    /// Visible buttons in declaration order.
    pub buttons: Vec<String>,
    /// Tab to open first, if any tab is visible.
    pub default_tab: Option<String>,
}

impl PolicyEvaluator {
    /// Builds the capability snapshot of one resource.
    #[must_use]
    pub fn capabilities(
        &self,
        actor: &Actor,
        resource: &str,
        preferred_tab: Option<&str>,
    ) -> CapabilitySnapshot {
        let actions = ActionType::all()
            .iter()
            .copied()
            .filter(|action| self.can_perform_action(actor, resource, *action))
            .collect();
        let tabs = self.visible_tabs(actor, resource);
        let default_tab = pick_default_tab(tabs.clone(), preferred_tab);

        CapabilitySnapshot {
            resource: resource.to_owned(),
            actions,
            tabs,
            sections: self.visible_sections(actor, resource),
            buttons: self.visible_buttons(actor, resource),
            default_tab,
        }
    }

    /// Builds snapshots for every configured resource in declaration order.
    #[must_use]
    pub fn capabilities_for_all(&self, actor: &Actor) -> Vec<CapabilitySnapshot> {
        self.config
            .resources()
            .iter()
            .map(|resource| self.capabilities(actor, resource, None))
            .collect()
    }
}
