use std::collections::HashMap;
use std::sync::Arc;

use branchgate_domain::{ActionType, Actor, ActorKey, UiComponentType};
use parking_lot::Mutex;
use tracing::debug;

use crate::policy_evaluator::CapabilitySnapshot;
use crate::{ActorSource, PolicyEvaluator, TabDescriptor};

#[cfg(test)]
mod tests;

/// Upper bound on answers kept for one actor epoch. Queries carry caller
/// strings, so the cache starts over instead of growing without limit.
const MAX_CACHED_ANSWERS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PolicyQuery {
    Action {
        resource: String,
        action: ActionType,
    },
    Component {
        resource: String,
        component_type: UiComponentType,
        component_id: String,
    },
    Visible {
        resource: String,
        component_type: UiComponentType,
    },
    DefaultTab {
        resource: String,
        preferred: Option<String>,
    },
}

#[derive(Debug, Clone)]
enum PolicyAnswer {
    Allowed(bool),
    Ids(Arc<[String]>),
    Tab(Option<String>),
}

/// Answers cached for one actor identity.
///
/// Entries are also keyed by the actor identity, and the whole map is dropped
/// when the identity of the current actor changes.
#[derive(Debug, Default)]
struct EpochCache {
    epoch: Option<ActorKey>,
    entries: HashMap<(ActorKey, PolicyQuery), PolicyAnswer>,
}

impl EpochCache {
    fn enter(&mut self, key: ActorKey) {
        if self.epoch == Some(key) {
            return;
        }

        if self.epoch.is_some() {
            debug!(
                target: "branchgate::policy",
                dropped = self.entries.len(),
                role = key.role().map(|role| role.as_str()).unwrap_or("none"),
                "actor changed; dropping cached policy answers"
            );
        }
        self.entries.clear();
        self.epoch = Some(key);
    }

    fn get_or_insert_with(
        &mut self,
        key: ActorKey,
        query: PolicyQuery,
        compute: impl FnOnce() -> PolicyAnswer,
    ) -> PolicyAnswer {
        let entry_key = (key, query);
        if let Some(answer) = self.entries.get(&entry_key) {
            return answer.clone();
        }

        if self.entries.len() >= MAX_CACHED_ANSWERS {
            debug!(
                target: "branchgate::policy",
                dropped = self.entries.len(),
                "policy answer cache full; starting over"
            );
            self.entries.clear();
        }

        let answer = compute();
        self.entries.insert(entry_key, answer.clone());
        answer
    }
}

/// Evaluator bound to the actor of the current session.
///
/// Mirrors [`PolicyEvaluator`] without the actor parameter. Answers are
/// memoized per actor identity; the actor is read from the source on every
/// call, inside the same critical section that checks the cache epoch, so an
/// answer computed for one actor is never served to another.
pub struct ActorBoundPolicy<S> {
    evaluator: PolicyEvaluator,
    source: S,
    cache: Mutex<EpochCache>,
}

impl<S> ActorBoundPolicy<S>
where
    S: ActorSource,
{
    /// Binds an evaluator to an actor source.
    #[must_use]
    pub fn new(evaluator: PolicyEvaluator, source: S) -> Self {
        Self {
            evaluator,
            source,
            cache: Mutex::new(EpochCache::default()),
        }
    }

    /// Returns the underlying evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &PolicyEvaluator {
        &self.evaluator
    }

    /// Returns the actor the next query will be answered for.
    #[must_use]
    pub fn current_actor(&self) -> Actor {
        self.source.current_actor()
    }

    /// Returns whether the current actor may perform `action` on `resource`.
    #[must_use]
    pub fn can_perform_action(&self, resource: &str, action: ActionType) -> bool {
        self.with_epoch(|cache, actor| self.cached_action(cache, actor, resource, action))
    }

    /// Returns whether the current actor may see one UI component.
    #[must_use]
    pub fn can_view_ui_component(
        &self,
        resource: &str,
        component_type: UiComponentType,
        component_id: &str,
    ) -> bool {
        self.with_epoch(|cache, actor| {
            self.cached_component(cache, actor, resource, component_type, component_id)
        })
    }

    /// See [`PolicyEvaluator::can_create`].
    #[must_use]
    pub fn can_create(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::Create)
    }

    /// See [`PolicyEvaluator::can_edit`].
    #[must_use]
    pub fn can_edit(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::Edit)
    }

    /// See [`PolicyEvaluator::can_delete`].
    #[must_use]
    pub fn can_delete(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::Delete)
    }

    /// See [`PolicyEvaluator::can_view`].
    #[must_use]
    pub fn can_view(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::View)
    }

    /// See [`PolicyEvaluator::can_export`].
    #[must_use]
    pub fn can_export(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::Export)
    }

    /// See [`PolicyEvaluator::can_import`].
    #[must_use]
    pub fn can_import(&self, resource: &str) -> bool {
        self.can_perform_action(resource, ActionType::Import)
    }

    /// Returns visible component ids of one type in declaration order.
    ///
    /// Repeated calls for the same actor identity return the same shared
    /// slice.
    #[must_use]
    pub fn visible_components(
        &self,
        resource: &str,
        component_type: UiComponentType,
    ) -> Arc<[String]> {
        self.with_epoch(|cache, actor| {
            let query = PolicyQuery::Visible {
                resource: resource.to_owned(),
                component_type,
            };
            let answer = cache.get_or_insert_with(actor.key(), query, || {
                PolicyAnswer::Ids(
                    self.evaluator
                        .visible_components(actor, resource, component_type)
                        .into(),
                )
            });

            match answer {
                PolicyAnswer::Ids(ids) => ids,
                PolicyAnswer::Allowed(_) | PolicyAnswer::Tab(_) => Arc::from(Vec::new()),
            }
        })
    }

    /// Returns visible tab ids in declaration order.
    #[must_use]
    pub fn visible_tabs(&self, resource: &str) -> Arc<[String]> {
        self.visible_components(resource, UiComponentType::Tab)
    }

    /// Returns visible section ids in declaration order.
    #[must_use]
    pub fn visible_sections(&self, resource: &str) -> Arc<[String]> {
        self.visible_components(resource, UiComponentType::Section)
    }

    /// Returns visible button ids in declaration order.
    #[must_use]
    pub fn visible_buttons(&self, resource: &str) -> Arc<[String]> {
        self.visible_components(resource, UiComponentType::Button)
    }

    /// Filters caller-supplied tabs, keeping the caller's order.
    ///
    /// Every tab is checked against the same actor, even if the session
    /// switches actor while the list is being filtered.
    #[must_use]
    pub fn filter_tabs_by_permission<T>(&self, resource: &str, tabs: Vec<T>) -> Vec<T>
    where
        T: TabDescriptor,
    {
        self.with_epoch(|cache, actor| {
            tabs.into_iter()
                .filter(|tab| {
                    self.cached_component(
                        cache,
                        actor,
                        resource,
                        UiComponentType::Tab,
                        tab.value(),
                    )
                })
                .collect()
        })
    }

    /// See [`PolicyEvaluator::default_tab`].
    #[must_use]
    pub fn default_tab(&self, resource: &str, preferred: Option<&str>) -> Option<String> {
        self.with_epoch(|cache, actor| {
            let query = PolicyQuery::DefaultTab {
                resource: resource.to_owned(),
                preferred: preferred.map(ToOwned::to_owned),
            };
            let answer = cache.get_or_insert_with(actor.key(), query, || {
                PolicyAnswer::Tab(self.evaluator.default_tab(actor, resource, preferred))
            });

            match answer {
                PolicyAnswer::Tab(tab) => tab,
                PolicyAnswer::Allowed(_) | PolicyAnswer::Ids(_) => None,
            }
        })
    }

    /// Builds the capability snapshot of one resource for the current actor.
    ///
    /// Snapshots are not memoized; they are assembled from a single actor read.
    #[must_use]
    pub fn capabilities(&self, resource: &str, preferred_tab: Option<&str>) -> CapabilitySnapshot {
        let actor = self.source.current_actor();
        self.evaluator.capabilities(&actor, resource, preferred_tab)
    }

    /// Returns how many answers are cached for the current epoch.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().entries.len()
    }

    /// Drops every cached answer, e.g. from a sign-out hook.
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.entries.clear();
        cache.epoch = None;
    }

    fn with_epoch<R>(&self, query: impl FnOnce(&mut EpochCache, &Actor) -> R) -> R {
        let mut cache = self.cache.lock();
        let actor = self.source.current_actor();
        cache.enter(actor.key());
        query(&mut cache, &actor)
    }

    fn cached_action(
        &self,
        cache: &mut EpochCache,
        actor: &Actor,
        resource: &str,
        action: ActionType,
    ) -> bool {
        let query = PolicyQuery::Action {
            resource: resource.to_owned(),
            action,
        };
        let answer = cache.get_or_insert_with(actor.key(), query, || {
            PolicyAnswer::Allowed(self.evaluator.can_perform_action(actor, resource, action))
        });

        matches!(answer, PolicyAnswer::Allowed(true))
    }

    fn cached_component(
        &self,
        cache: &mut EpochCache,
        actor: &Actor,
        resource: &str,
        component_type: UiComponentType,
        component_id: &str,
    ) -> bool {
        let query = PolicyQuery::Component {
            resource: resource.to_owned(),
            component_type,
            component_id: component_id.to_owned(),
        };
        let answer = cache.get_or_insert_with(actor.key(), query, || {
            PolicyAnswer::Allowed(self.evaluator.can_view_ui_component(
                actor,
                resource,
                component_type,
                component_id,
            ))
        });

        matches!(answer, PolicyAnswer::Allowed(true))
    }
}
