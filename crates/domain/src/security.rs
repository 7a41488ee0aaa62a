use std::fmt::{Display, Formatter};
use std::str::FromStr;

use branchgate_core::AppError;
use serde::{Deserialize, Serialize};

/// Authority level an actor holds inside one branch.
///
/// Membership checks are exact: no role implies another, so an
/// "administrators see everything" rule has to be written out per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Top-level administrator across the whole institute.
    InstituteAdmin,
    /// Administrator of a single branch.
    Admin,
    /// Finance officer.
    Accountant,
    /// Academic officer.
    AcademicOfficer,
    /// Front desk staff.
    Receptionist,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstituteAdmin => "INSTITUTE_ADMIN",
            Self::Admin => "ADMIN",
            Self::Accountant => "ACCOUNTANT",
            Self::AcademicOfficer => "ACADEMIC_OFFICER",
            Self::Receptionist => "RECEPTIONIST",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::InstituteAdmin,
            Role::Admin,
            Role::Accountant,
            Role::AcademicOfficer,
            Role::Receptionist,
        ];

        ALL
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INSTITUTE_ADMIN" => Ok(Self::InstituteAdmin),
            "ADMIN" => Ok(Self::Admin),
            "ACCOUNTANT" => Ok(Self::Accountant),
            "ACADEMIC_OFFICER" => Ok(Self::AcademicOfficer),
            "RECEPTIONIST" => Ok(Self::Receptionist),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Action dimension over a resource. Every action is granted on its own;
/// granting `Edit` says nothing about `View` or `Delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create new records.
    Create,
    /// Edit existing records.
    Edit,
    /// Delete records.
    Delete,
    /// View records.
    View,
    /// Export records to a file.
    Export,
    /// Import records from a file.
    Import,
}

impl ActionType {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::View => "view",
            Self::Export => "export",
            Self::Import => "import",
        }
    }

    /// Returns all known actions in their canonical order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ActionType] = &[
            ActionType::Create,
            ActionType::Edit,
            ActionType::Delete,
            ActionType::View,
            ActionType::Export,
            ActionType::Import,
        ];

        ALL
    }
}

impl Display for ActionType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            "view" => Ok(Self::View),
            "export" => Ok(Self::Export),
            "import" => Ok(Self::Import),
            _ => Err(AppError::Validation(format!(
                "unknown action type '{value}'"
            ))),
        }
    }
}

/// Class of UI surface whose visibility is gated independently of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiComponentType {
    /// Navigational tab on a resource page.
    Tab,
    /// Page section.
    Section,
    /// Action button.
    Button,
}

impl UiComponentType {
    /// Returns a stable storage value for this component type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::Section => "section",
            Self::Button => "button",
        }
    }

    /// Returns all known component types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[UiComponentType] = &[
            UiComponentType::Tab,
            UiComponentType::Section,
            UiComponentType::Button,
        ];

        ALL
    }
}

impl Display for UiComponentType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for UiComponentType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tab" => Ok(Self::Tab),
            "section" => Ok(Self::Section),
            "button" => Ok(Self::Button),
            _ => Err(AppError::Validation(format!(
                "unknown ui component type '{value}'"
            ))),
        }
    }
}
