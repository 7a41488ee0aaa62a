use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use branchgate_application::PolicySource;
use branchgate_core::{AppError, AppResult};
use branchgate_domain::{
    ActionType, Dimension, PermissionEntry, PolicyConfig, Role, UiComponentType,
};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Policy table compiled into the binary.
///
/// Component lists are ordered: the first tab a role can see is the tab it
/// lands on, so each resource lists its primary tab first.
const EMBEDDED_POLICY: &str = include_str!("../policy/branch_policy.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyDocument {
    version: u32,
    resources: Vec<ResourceDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceDocument {
    resource: String,
    #[serde(default, deserialize_with = "action_entries")]
    actions: Vec<(String, Vec<Role>)>,
    #[serde(default)]
    tabs: Vec<ComponentDocument>,
    #[serde(default)]
    sections: Vec<ComponentDocument>,
    #[serde(default)]
    buttons: Vec<ComponentDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentDocument {
    id: String,
    roles: Vec<Role>,
}

/// Keeps every key of the `actions` object in document order, repeats
/// included, so the loader can reject them instead of keeping the last one.
fn action_entries<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<Role>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ActionEntries;

    impl<'de> Visitor<'de> for ActionEntries {
        type Value = Vec<(String, Vec<Role>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map from action name to role list")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<Role>>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(ActionEntries)
}

/// Policy source backed by a JSON document fixed at build time.
#[derive(Debug, Clone, Copy)]
pub struct StaticPolicySource {
    document: &'static str,
}

impl StaticPolicySource {
    /// Returns the source for the table embedded in this build.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            document: EMBEDDED_POLICY,
        }
    }

    /// Returns a source for another static JSON document.
    #[must_use]
    pub fn from_json(document: &'static str) -> Self {
        Self { document }
    }
}

impl Default for StaticPolicySource {
    fn default() -> Self {
        Self::embedded()
    }
}

impl PolicySource for StaticPolicySource {
    fn load(&self) -> AppResult<PolicyConfig> {
        let document: PolicyDocument = serde_json::from_str(self.document)
            .map_err(|error| AppError::Validation(format!("invalid policy document: {error}")))?;

        let version = document.version;
        let entries = permission_entries(document)?;
        debug!(
            target: "branchgate::policy",
            version,
            entries = entries.len(),
            "parsed static policy document"
        );

        PolicyConfig::from_entries(version, entries)
    }
}

fn permission_entries(document: PolicyDocument) -> AppResult<Vec<PermissionEntry>> {
    let mut seen_resources = HashSet::new();
    let mut entries = Vec::new();

    for resource in document.resources {
        if !seen_resources.insert(resource.resource.clone()) {
            return Err(AppError::Validation(format!(
                "policy document declares resource '{}' more than once",
                resource.resource
            )));
        }

        let mut seen_actions = HashSet::new();
        for (action, roles) in resource.actions {
            let action = ActionType::from_str(action.as_str())?;
            if !seen_actions.insert(action) {
                return Err(AppError::Validation(format!(
                    "policy document configures action '{action}' of resource '{}' more than once",
                    resource.resource
                )));
            }
            entries.push(PermissionEntry::new(
                resource.resource.as_str(),
                Dimension::action(action),
                roles,
            )?);
        }

        let components = [
            (UiComponentType::Tab, resource.tabs),
            (UiComponentType::Section, resource.sections),
            (UiComponentType::Button, resource.buttons),
        ];
        for (component_type, declared) in components {
            for component in declared {
                entries.push(PermissionEntry::new(
                    resource.resource.as_str(),
                    Dimension::component(component_type, component.id)?,
                    component.roles,
                )?);
            }
        }
    }

    Ok(entries)
}
