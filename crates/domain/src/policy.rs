use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use branchgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{ActionType, Role, UiComponentType};

/// Permission dimension an entry governs: an action, or one UI component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimension {
    /// Action over the resource.
    Action {
        /// Governed action.
        action: ActionType,
    },
    /// Visibility of one UI component of the resource.
    Component {
        /// Component class.
        component_type: UiComponentType,
        /// Component id, unique within resource and component type.
        component_id: NonEmptyString,
    },
}

impl Dimension {
    /// Creates an action dimension.
    #[must_use]
    pub fn action(action: ActionType) -> Self {
        Self::Action { action }
    }

    /// Creates a validated component dimension.
    pub fn component(
        component_type: UiComponentType,
        component_id: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self::Component {
            component_type,
            component_id: NonEmptyString::new(component_id)?,
        })
    }

    /// Returns the borrowed lookup key for this dimension.
    #[must_use]
    pub fn key(&self) -> DimensionKey<'_> {
        match self {
            Self::Action { action } => DimensionKey::Action(*action),
            Self::Component {
                component_type,
                component_id,
            } => DimensionKey::Component(*component_type, component_id.as_str()),
        }
    }
}

/// Borrowed lookup key into [`PolicyConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKey<'a> {
    /// Action lookup.
    Action(ActionType),
    /// Component lookup by type and id.
    Component(UiComponentType, &'a str),
}

impl Display for DimensionKey<'_> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Action(action) => write!(formatter, "action:{action}"),
            Self::Component(component_type, component_id) => {
                write!(formatter, "{component_type}:{component_id}")
            }
        }
    }
}

/// Atomic configuration unit: which roles may use one dimension of one
/// resource. An empty role list is an explicit "nobody".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    resource: NonEmptyString,
    dimension: Dimension,
    allowed_roles: Vec<Role>,
}

impl PermissionEntry {
    /// Creates a validated entry. Repeated roles collapse to their first
    /// occurrence.
    pub fn new(
        resource: impl Into<String>,
        dimension: Dimension,
        allowed_roles: impl IntoIterator<Item = Role>,
    ) -> AppResult<Self> {
        let mut roles = Vec::new();
        for role in allowed_roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Ok(Self {
            resource: NonEmptyString::new(resource)?,
            dimension,
            allowed_roles: roles,
        })
    }

    /// Returns the governed resource.
    #[must_use]
    pub fn resource(&self) -> &NonEmptyString {
        &self.resource
    }

    /// Returns the governed dimension.
    #[must_use]
    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// Returns roles allowed by this entry.
    #[must_use]
    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }
}

/// Action pair that a configured resource leaves without an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationGap {
    /// Resource name.
    pub resource: String,
    /// Action missing from the resource's configuration.
    pub action: ActionType,
}

#[derive(Debug, Default)]
struct ComponentTable {
    declared: Vec<String>,
    roles: HashMap<String, Vec<Role>>,
}

#[derive(Debug, Default)]
struct ResourcePolicy {
    actions: HashMap<ActionType, Vec<Role>>,
    tabs: ComponentTable,
    sections: ComponentTable,
    buttons: ComponentTable,
}

impl ResourcePolicy {
    fn components(&self, component_type: UiComponentType) -> &ComponentTable {
        match component_type {
            UiComponentType::Tab => &self.tabs,
            UiComponentType::Section => &self.sections,
            UiComponentType::Button => &self.buttons,
        }
    }

    fn components_mut(&mut self, component_type: UiComponentType) -> &mut ComponentTable {
        match component_type {
            UiComponentType::Tab => &mut self.tabs,
            UiComponentType::Section => &mut self.sections,
            UiComponentType::Button => &mut self.buttons,
        }
    }
}

/// Immutable policy table built once at startup.
///
/// Components keep their declaration order per resource and type. That order
/// is observable: visible tabs are listed in it and the first visible tab is
/// the default one, so the most important tab should be declared first.
#[derive(Debug, Default)]
pub struct PolicyConfig {
    version: u32,
    declared_resources: Vec<String>,
    resources: HashMap<String, ResourcePolicy>,
}

impl PolicyConfig {
    /// Builds the table from entries, rejecting duplicated dimensions.
    pub fn from_entries(
        version: u32,
        entries: impl IntoIterator<Item = PermissionEntry>,
    ) -> AppResult<Self> {
        let mut config = Self {
            version,
            ..Self::default()
        };

        for entry in entries {
            let PermissionEntry {
                resource,
                dimension,
                allowed_roles,
            } = entry;
            let resource = String::from(resource);

            if !config.resources.contains_key(&resource) {
                config.declared_resources.push(resource.clone());
            }
            let policy = config.resources.entry(resource.clone()).or_default();

            match dimension {
                Dimension::Action { action } => {
                    if policy.actions.insert(action, allowed_roles).is_some() {
                        return Err(AppError::Validation(format!(
                            "resource '{resource}' declares action '{action}' more than once"
                        )));
                    }
                }
                Dimension::Component {
                    component_type,
                    component_id,
                } => {
                    let table = policy.components_mut(component_type);
                    let component_id = String::from(component_id);
                    if table.roles.contains_key(&component_id) {
                        return Err(AppError::Validation(format!(
                            "resource '{resource}' declares {component_type} '{component_id}' more than once"
                        )));
                    }
                    table.declared.push(component_id.clone());
                    table.roles.insert(component_id, allowed_roles);
                }
            }
        }

        Ok(config)
    }

    /// Returns the policy table version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns configured resources in declaration order.
    #[must_use]
    pub fn resources(&self) -> &[String] {
        &self.declared_resources
    }

    /// Returns allowed roles for one dimension of a resource.
    ///
    /// `None` is a configuration gap; `Some(&[])` is an explicit "nobody".
    /// Both deny, but they are different diagnostics.
    #[must_use]
    pub fn lookup(&self, resource: &str, key: DimensionKey<'_>) -> Option<&[Role]> {
        let policy = self.resources.get(resource)?;
        match key {
            DimensionKey::Action(action) => policy.actions.get(&action).map(Vec::as_slice),
            DimensionKey::Component(component_type, component_id) => policy
                .components(component_type)
                .roles
                .get(component_id)
                .map(Vec::as_slice),
        }
    }

    /// Returns component ids of one type in declaration order. Unknown
    /// resources have no components.
    #[must_use]
    pub fn component_ids(&self, resource: &str, component_type: UiComponentType) -> &[String] {
        self.resources
            .get(resource)
            .map(|policy| policy.components(component_type).declared.as_slice())
            .unwrap_or_default()
    }

    /// Lists actions that configured resources leave without an entry.
    #[must_use]
    pub fn configuration_gaps(&self) -> Vec<ConfigurationGap> {
        let mut gaps = Vec::new();
        for resource in &self.declared_resources {
            let Some(policy) = self.resources.get(resource) else {
                continue;
            };
            for action in ActionType::all() {
                if !policy.actions.contains_key(action) {
                    gaps.push(ConfigurationGap {
                        resource: resource.clone(),
                        action: *action,
                    });
                }
            }
        }

        gaps
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{ActionType, Role, UiComponentType};

    use super::{Dimension, DimensionKey, PermissionEntry, PolicyConfig};

    fn tab(resource: &str, id: &str, roles: &[Role]) -> PermissionEntry {
        let dimension = Dimension::component(UiComponentType::Tab, id);
        assert!(dimension.is_ok());
        let entry = dimension
            .and_then(|dimension| PermissionEntry::new(resource, dimension, roles.to_vec()));
        assert!(entry.is_ok());
        entry.unwrap_or_else(|_| unreachable!())
    }

    fn action(resource: &str, action: ActionType, roles: &[Role]) -> PermissionEntry {
        let entry = PermissionEntry::new(resource, Dimension::action(action), roles.to_vec());
        assert!(entry.is_ok());
        entry.unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn lookup_distinguishes_gap_from_empty_entry() {
        let config = PolicyConfig::from_entries(
            1,
            [
                action("users", ActionType::Edit, &[Role::Admin]),
                action("users", ActionType::Delete, &[]),
            ],
        );
        assert!(config.is_ok());
        let config = config.unwrap_or_default();

        assert_eq!(
            config.lookup("users", DimensionKey::Action(ActionType::Edit)),
            Some([Role::Admin].as_slice())
        );
        assert_eq!(
            config.lookup("users", DimensionKey::Action(ActionType::Delete)),
            Some([].as_slice())
        );
        assert_eq!(
            config.lookup("users", DimensionKey::Action(ActionType::View)),
            None
        );
        assert_eq!(
            config.lookup("payroll", DimensionKey::Action(ActionType::Edit)),
            None
        );
    }

    #[test]
    fn duplicate_action_entries_are_rejected() {
        let config = PolicyConfig::from_entries(
            1,
            [
                action("users", ActionType::Edit, &[Role::Admin]),
                action("users", ActionType::Edit, &[Role::Accountant]),
            ],
        );
        assert!(config.is_err());
    }

    #[test]
    fn duplicate_component_entries_are_rejected() {
        let config = PolicyConfig::from_entries(
            1,
            [
                tab("users", "overview", &[Role::Admin]),
                tab("users", "overview", &[Role::Accountant]),
            ],
        );
        assert!(config.is_err());
    }

    #[test]
    fn same_component_id_may_repeat_across_types() {
        let section = Dimension::component(UiComponentType::Section, "overview")
            .and_then(|dimension| PermissionEntry::new("users", dimension, [Role::Admin]));
        assert!(section.is_ok());

        let config = PolicyConfig::from_entries(
            1,
            [
                tab("users", "overview", &[Role::Admin]),
                section.unwrap_or_else(|_| unreachable!()),
            ],
        );
        assert!(config.is_ok());
    }

    #[test]
    fn blank_resource_or_component_is_rejected() {
        assert!(PermissionEntry::new(" ", Dimension::action(ActionType::View), []).is_err());
        assert!(Dimension::component(UiComponentType::Button, "").is_err());
    }

    #[test]
    fn component_ids_follow_declaration_order() {
        let config = PolicyConfig::from_entries(
            1,
            [
                tab("users", "overview", &[Role::Admin]),
                tab("users", "roles", &[]),
                tab("users", "audit", &[Role::InstituteAdmin]),
            ],
        )
        .unwrap_or_default();

        assert_eq!(
            config.component_ids("users", UiComponentType::Tab),
            ["overview", "roles", "audit"]
        );
        assert!(config.component_ids("users", UiComponentType::Button).is_empty());
        assert!(config.component_ids("payroll", UiComponentType::Tab).is_empty());
    }

    #[test]
    fn resources_follow_first_declaration() {
        let config = PolicyConfig::from_entries(
            4,
            [
                action("payroll", ActionType::View, &[Role::Accountant]),
                action("users", ActionType::View, &[Role::Admin]),
                action("payroll", ActionType::Edit, &[Role::Accountant]),
            ],
        )
        .unwrap_or_default();

        assert_eq!(config.version(), 4);
        assert_eq!(config.resources(), ["payroll", "users"]);
    }

    #[test]
    fn configuration_gaps_list_missing_actions() {
        let config = PolicyConfig::from_entries(
            1,
            ActionType::all()
                .iter()
                .filter(|action| **action != ActionType::Import)
                .map(|value| action("students", *value, &[Role::Admin])),
        )
        .unwrap_or_default();

        let gaps = config.configuration_gaps();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].resource, "students");
        assert_eq!(gaps[0].action, ActionType::Import);
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        proptest::sample::select(Role::all().to_vec())
    }

    proptest! {
        #[test]
        fn entry_roles_are_unique_and_keep_first_occurrence(
            roles in proptest::collection::vec(role_strategy(), 0..12)
        ) {
            let entry = PermissionEntry::new("users", Dimension::action(ActionType::View), roles.clone());
            prop_assert!(entry.is_ok());
            let entry = entry.unwrap_or_else(|_| unreachable!());

            let mut expected = Vec::new();
            for role in roles {
                if !expected.contains(&role) {
                    expected.push(role);
                }
            }
            prop_assert_eq!(entry.allowed_roles(), expected.as_slice());
        }
    }
}
