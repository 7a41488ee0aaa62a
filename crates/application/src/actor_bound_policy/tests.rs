use std::sync::Arc;
use std::thread;

use branchgate_domain::{
    ActionType, Actor, Dimension, PermissionEntry, PolicyConfig, Role, UiComponentType,
};
use parking_lot::RwLock;
use proptest::prelude::*;

use crate::{ActorSource, PolicyEvaluator};

use super::{ActorBoundPolicy, MAX_CACHED_ANSWERS};

#[derive(Default)]
struct SwitchableActor {
    actor: RwLock<Actor>,
}

impl SwitchableActor {
    fn as_role(role: Role) -> Arc<Self> {
        Arc::new(Self {
            actor: RwLock::new(Actor::with_role(role)),
        })
    }

    fn switch_to(&self, actor: Actor) {
        *self.actor.write() = actor;
    }
}

impl ActorSource for SwitchableActor {
    fn current_actor(&self) -> Actor {
        *self.actor.read()
    }
}

fn entry(resource: &str, dimension: Dimension, roles: &[Role]) -> PermissionEntry {
    PermissionEntry::new(resource, dimension, roles.to_vec())
        .unwrap_or_else(|_| unreachable!("static test entry"))
}

fn tab(resource: &str, id: &str, roles: &[Role]) -> PermissionEntry {
    let dimension = Dimension::component(UiComponentType::Tab, id)
        .unwrap_or_else(|_| unreachable!("static test dimension"));
    entry(resource, dimension, roles)
}

fn evaluator() -> PolicyEvaluator {
    let config = PolicyConfig::from_entries(
        1,
        [
            entry(
                "payroll",
                Dimension::action(ActionType::Edit),
                &[Role::Accountant],
            ),
            entry(
                "payroll",
                Dimension::action(ActionType::View),
                &[Role::Accountant, Role::Admin],
            ),
            tab("payroll", "runs", &[Role::Accountant, Role::Admin]),
            tab("payroll", "payslips", &[Role::Accountant]),
            tab("payroll", "settings", &[Role::Admin]),
        ],
    )
    .unwrap_or_default();

    PolicyEvaluator::new(Arc::new(config))
}

fn bound(source: Arc<SwitchableActor>) -> ActorBoundPolicy<Arc<SwitchableActor>> {
    ActorBoundPolicy::new(evaluator(), source)
}

#[test]
fn role_switch_never_serves_previous_answer() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = bound(source.clone());

    assert!(policy.can_edit("payroll"));

    source.switch_to(Actor::with_role(Role::Admin));
    assert!(!policy.can_edit("payroll"));

    source.switch_to(Actor::with_role(Role::Accountant));
    assert!(policy.can_edit("payroll"));
}

#[test]
fn logout_denies_immediately() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = bound(source.clone());

    assert!(policy.can_view("payroll"));
    assert_eq!(policy.visible_tabs("payroll").len(), 2);

    source.switch_to(Actor::anonymous());
    assert!(!policy.can_view("payroll"));
    assert!(policy.visible_tabs("payroll").is_empty());
    assert_eq!(policy.default_tab("payroll", Some("runs")), None);
}

#[test]
fn collection_answers_switch_with_actor() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = bound(source.clone());

    assert_eq!(policy.visible_tabs("payroll").to_vec(), vec!["runs", "payslips"]);
    assert_eq!(policy.default_tab("payroll", Some("settings")).as_deref(), Some("runs"));

    source.switch_to(Actor::with_role(Role::Admin));
    assert_eq!(policy.visible_tabs("payroll").to_vec(), vec!["runs", "settings"]);
    assert_eq!(
        policy.default_tab("payroll", Some("settings")).as_deref(),
        Some("settings")
    );
    assert_eq!(
        policy.filter_tabs_by_permission("payroll", vec!["payslips", "settings"]),
        vec!["settings"]
    );
}

#[test]
fn repeated_queries_share_cached_slice() {
    let policy = bound(SwitchableActor::as_role(Role::Accountant));

    let first = policy.visible_tabs("payroll");
    let second = policy.visible_tabs("payroll");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(policy.cached_entries(), 1);

    let _ = policy.can_edit("payroll");
    let _ = policy.can_edit("payroll");
    assert_eq!(policy.cached_entries(), 2);
}

#[test]
fn actor_switch_drops_cached_entries() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = bound(source.clone());

    let before = policy.visible_tabs("payroll");
    let _ = policy.can_edit("payroll");
    let _ = policy.can_view("payroll");
    assert_eq!(policy.cached_entries(), 3);

    source.switch_to(Actor::with_role(Role::Admin));
    let after = policy.visible_tabs("payroll");
    assert_eq!(policy.cached_entries(), 1);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn branch_switch_with_same_role_keeps_cache() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = bound(source.clone());

    let before = policy.visible_tabs("payroll");
    source.switch_to(Actor::new(
        Some(Role::Accountant),
        Some(branchgate_core::BranchId::new()),
    ));
    let after = policy.visible_tabs("payroll");

    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn clear_forgets_everything() {
    let policy = bound(SwitchableActor::as_role(Role::Accountant));

    let before = policy.visible_tabs("payroll");
    policy.clear();
    assert_eq!(policy.cached_entries(), 0);

    let after = policy.visible_tabs("payroll");
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);
}

#[test]
fn unknown_resource_is_denied_and_cached_as_denied() {
    let policy = bound(SwitchableActor::as_role(Role::Admin));

    assert!(!policy.can_view("timetable"));
    assert!(!policy.can_view("timetable"));
    assert!(policy.visible_sections("timetable").is_empty());
    assert!(policy.visible_buttons("timetable").is_empty());
    assert!(!policy.can_view_ui_component("timetable", UiComponentType::Button, "print"));
}

#[test]
fn cache_stays_bounded_under_distinct_caller_strings() {
    let policy = bound(SwitchableActor::as_role(Role::Accountant));

    for index in 0..MAX_CACHED_ANSWERS + 16 {
        let component_id = format!("tab-{index}");
        assert!(!policy.can_view_ui_component(
            "payroll",
            UiComponentType::Tab,
            component_id.as_str()
        ));
        assert!(policy.cached_entries() <= MAX_CACHED_ANSWERS);
    }

    assert!(policy.can_edit("payroll"));
    assert!(policy.can_edit("payroll"));
}

#[test]
fn capabilities_use_current_actor() {
    let source = SwitchableActor::as_role(Role::Admin);
    let policy = bound(source.clone());

    let snapshot = policy.capabilities("payroll", None);
    assert_eq!(snapshot.actions, vec![ActionType::View]);
    assert_eq!(snapshot.default_tab.as_deref(), Some("runs"));

    source.switch_to(Actor::anonymous());
    let snapshot = policy.capabilities("payroll", None);
    assert!(snapshot.actions.is_empty());
    assert_eq!(snapshot.default_tab, None);
}

#[test]
fn concurrent_switches_never_mix_answers() {
    let source = SwitchableActor::as_role(Role::Accountant);
    let policy = Arc::new(bound(source.clone()));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let policy = policy.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let tabs = policy.visible_tabs("payroll");
                    let valid = tabs.is_empty()
                        || tabs[..] == ["runs", "payslips"]
                        || tabs[..] == ["runs", "settings"];
                    if !valid {
                        return false;
                    }
                }
                true
            })
        })
        .collect();

    for round in 0..500 {
        let actor = match round % 3 {
            0 => Actor::with_role(Role::Admin),
            1 => Actor::anonymous(),
            _ => Actor::with_role(Role::Accountant),
        };
        source.switch_to(actor);
    }

    for reader in readers {
        assert!(reader.join().unwrap_or(false));
    }
}

fn role_strategy() -> impl Strategy<Value = Option<Role>> {
    proptest::option::of(proptest::sample::select(Role::all().to_vec()))
}

proptest! {
    #[test]
    fn bound_answers_match_direct_evaluation_across_switches(
        roles in proptest::collection::vec(role_strategy(), 1..12),
    ) {
        let source = Arc::new(SwitchableActor::default());
        let policy = bound(source.clone());
        let direct = evaluator();

        for role in roles {
            let actor = Actor::new(role, None);
            source.switch_to(actor);

            for action in ActionType::all() {
                prop_assert_eq!(
                    policy.can_perform_action("payroll", *action),
                    direct.can_perform_action(&actor, "payroll", *action)
                );
            }
            prop_assert_eq!(
                policy.visible_tabs("payroll").to_vec(),
                direct.visible_tabs(&actor, "payroll")
            );
            prop_assert_eq!(
                policy.default_tab("payroll", Some("settings")),
                direct.default_tab(&actor, "payroll", Some("settings"))
            );
        }
    }
}
