use super::*;

impl PolicyEvaluator {
    /// Returns the visible component ids of one type, in declaration order.
    #[must_use]
    pub fn visible_components(
        &self,
        actor: &Actor,
        resource: &str,
        component_type: UiComponentType,
    ) -> Vec<String> {
        if actor.is_anonymous() {
            return Vec::new();
        }

        self.config
            .component_ids(resource, component_type)
            .iter()
            .filter(|component_id| {
                self.can_view_ui_component(actor, resource, component_type, component_id)
            })
            .cloned()
            .collect()
    }

    /// Returns visible tab ids in declaration order.
    #[must_use]
    pub fn visible_tabs(&self, actor: &Actor, resource: &str) -> Vec<String> {
        self.visible_components(actor, resource, UiComponentType::Tab)
    }

    /// Returns visible section ids in declaration order.
    #[must_use]
    pub fn visible_sections(&self, actor: &Actor, resource: &str) -> Vec<String> {
        self.visible_components(actor, resource, UiComponentType::Section)
    }

    /// Returns visible button ids in declaration order.
    #[must_use]
    pub fn visible_buttons(&self, actor: &Actor, resource: &str) -> Vec<String> {
        self.visible_components(actor, resource, UiComponentType::Button)
    }

    /// Picks the tab to open for `resource`.
    ///
    /// The preferred tab wins when it is visible. Otherwise the first visible
    /// tab in declaration order is used, which makes declaration order the
    /// priority ranking. `None` means no tab is permitted at all.
    #[must_use]
    pub fn default_tab(
        &self,
        actor: &Actor,
        resource: &str,
        preferred: Option<&str>,
    ) -> Option<String> {
        let visible = self.visible_tabs(actor, resource);
        pick_default_tab(visible, preferred)
    }
}

pub(crate) fn pick_default_tab(visible: Vec<String>, preferred: Option<&str>) -> Option<String> {
    if let Some(preferred) = preferred
        && visible.iter().any(|tab| tab == preferred)
    {
        return Some(preferred.to_owned());
    }

    visible.into_iter().next()
}
