//! Role-permission matrix types
//!
//! The backend returns one [`ModulePermission`] per module for a user type.
//! The wire schema is fixed: `moduleName` plus a `permissions` object with
//! the five CRUD flags, each defaulting to `false` when omitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module names used by the backend permission matrix
pub mod modules {
    /// Dashboard (always visible)
    pub const DASHBOARD: &str = "dashboard";
    /// Marketplace users
    pub const USERS: &str = "users";
    /// Partners (vendors)
    pub const PARTNERS: &str = "partners";
    /// Partner sub-users
    pub const SUB_USERS: &str = "sub_users";
    /// Roles
    pub const ROLES: &str = "roles";
    /// Role permission matrix
    pub const ROLE_PERMISSIONS: &str = "role_permissions";
    /// Properties
    pub const PROPERTY: &str = "property";
    /// Establishment types
    pub const ESTABLISHMENT: &str = "establishment";
    /// Space types and sub-types
    pub const SPACE_TYPES: &str = "space_types";
    /// Amenities
    pub const AMENITIES: &str = "amenities";
    /// Blogs
    pub const BLOGS: &str = "blogs";
    /// Jobs
    pub const JOBS: &str = "jobs";
    /// Payments
    pub const PAYMENTS: &str = "payments";
    /// Notifications
    pub const NOTIFICATIONS: &str = "notifications";
    /// Support tickets
    pub const SUPPORT: &str = "support";
}

/// CRUD action gated by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// See the module and its lists
    View,
    /// Create records
    Create,
    /// Edit records
    Edit,
    /// Delete records
    Delete,
    /// Export lists
    Export,
}

impl PermissionAction {
    /// Every action, in display order
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::Create,
        Self::Edit,
        Self::Delete,
        Self::Export,
    ];

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            "export" => Ok(Self::Export),
            other => Err(crate::Error::validation(
                "action",
                format!("unknown permission action '{other}'"),
            )),
        }
    }
}

/// The five CRUD flags for one module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PermissionFlags {
    /// View flag
    pub view: bool,
    /// Create flag
    pub create: bool,
    /// Edit flag
    pub edit: bool,
    /// Delete flag
    pub delete: bool,
    /// Export flag
    pub export: bool,
}

impl PermissionFlags {
    /// Flags with every action allowed
    #[must_use]
    pub const fn all() -> Self {
        Self {
            view: true,
            create: true,
            edit: true,
            delete: true,
            export: true,
        }
    }

    /// Flags allowing only `view`
    #[must_use]
    pub const fn view_only() -> Self {
        Self {
            view: true,
            create: false,
            edit: false,
            delete: false,
            export: false,
        }
    }

    /// Whether `action` is allowed
    #[must_use]
    pub const fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::View => self.view,
            PermissionAction::Create => self.create,
            PermissionAction::Edit => self.edit,
            PermissionAction::Delete => self.delete,
            PermissionAction::Export => self.export,
        }
    }

    /// Set the flag for `action`
    pub const fn set(&mut self, action: PermissionAction, allowed: bool) {
        match action {
            PermissionAction::View => self.view = allowed,
            PermissionAction::Create => self.create = allowed,
            PermissionAction::Edit => self.edit = allowed,
            PermissionAction::Delete => self.delete = allowed,
            PermissionAction::Export => self.export = allowed,
        }
    }
}

/// Permission flags of one module for the session's user type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermission {
    /// Module name, matching [`modules`]
    #[serde(rename = "moduleName")]
    pub module_name: String,

    /// CRUD flags
    #[serde(default)]
    pub permissions: PermissionFlags,
}

impl ModulePermission {
    /// Create a module permission entry
    pub fn new(module_name: impl Into<String>, permissions: PermissionFlags) -> Self {
        Self {
            module_name: module_name.into(),
            permissions,
        }
    }
}

/// Look up `action` on `module_name`
///
/// Returns `false` when the module is not in the list. The first entry for a
/// module wins if the backend ever sends duplicates.
#[must_use]
pub fn has_permission(
    permissions: &[ModulePermission],
    module_name: &str,
    action: PermissionAction,
) -> bool {
    permissions
        .iter()
        .find(|p| p.module_name == module_name)
        .is_some_and(|p| p.permissions.allows(action))
}

/// Actions the session may perform on `module_name`, in display order
#[must_use]
pub fn allowed_actions(
    permissions: &[ModulePermission],
    module_name: &str,
) -> Vec<PermissionAction> {
    PermissionAction::ALL
        .into_iter()
        .filter(|action| has_permission(permissions, module_name, *action))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample() -> Vec<ModulePermission> {
        vec![
            ModulePermission::new(modules::BLOGS, PermissionFlags::all()),
            ModulePermission::new(
                modules::ROLES,
                PermissionFlags {
                    view: true,
                    delete: true,
                    ..PermissionFlags::default()
                },
            ),
        ]
    }

    #[test]
    fn test_has_permission_absent_module_is_false() {
        assert!(!has_permission(&sample(), modules::JOBS, PermissionAction::View));
        assert!(!has_permission(&[], modules::BLOGS, PermissionAction::View));
    }

    #[test]
    fn test_has_permission_returns_exact_flag() {
        let perms = sample();
        assert!(has_permission(&perms, modules::ROLES, PermissionAction::View));
        assert!(has_permission(&perms, modules::ROLES, PermissionAction::Delete));
        assert!(!has_permission(&perms, modules::ROLES, PermissionAction::Create));
        assert!(!has_permission(&perms, modules::ROLES, PermissionAction::Export));
    }

    #[test]
    fn test_allowed_actions() {
        let perms = sample();
        assert_eq!(
            allowed_actions(&perms, modules::ROLES),
            vec![PermissionAction::View, PermissionAction::Delete]
        );
        assert_eq!(allowed_actions(&perms, modules::BLOGS).len(), 5);
        assert!(allowed_actions(&perms, modules::USERS).is_empty());
    }

    #[test]
    fn test_wire_schema_missing_flags_default_false() {
        let json = r#"[{"moduleName": "users", "permissions": {"view": true, "edit": true}},
                       {"moduleName": "jobs"}]"#;
        let perms: Vec<ModulePermission> = serde_json::from_str(json).unwrap();

        assert_eq!(perms[0].module_name, "users");
        assert!(perms[0].permissions.view);
        assert!(perms[0].permissions.edit);
        assert!(!perms[0].permissions.delete);
        assert_eq!(perms[1].permissions, PermissionFlags::default());
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("Delete".parse::<PermissionAction>().unwrap(), PermissionAction::Delete);
        assert!("approve".parse::<PermissionAction>().is_err());
    }

    proptest! {
        #[test]
        fn prop_has_permission_matches_flag(
            view in any::<bool>(),
            create in any::<bool>(),
            edit in any::<bool>(),
            delete in any::<bool>(),
            export in any::<bool>(),
        ) {
            let flags = PermissionFlags { view, create, edit, delete, export };
            let perms = vec![ModulePermission::new("property", flags)];
            for action in PermissionAction::ALL {
                prop_assert_eq!(has_permission(&perms, "property", action), flags.allows(action));
                prop_assert!(!has_permission(&perms, "blogs", action));
            }
        }
    }
}
