//! Sidebar navigation tree and its permission filter

use crate::permission::{ModulePermission, PermissionAction, has_permission, modules};
use serde::{Deserialize, Serialize};

/// One sidebar entry; groups carry children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display title
    pub title: String,

    /// Route of the entry's own page, if it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Icon name
    pub icon: String,

    /// Module whose `view` flag gates the entry and its children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Child links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// A link to a page gated by `module`
    #[must_use]
    pub fn link(title: &str, path: &str, icon: &str, module: &str) -> Self {
        Self {
            title: title.to_string(),
            path: Some(path.to_string()),
            icon: icon.to_string(),
            module_name: Some(module.to_string()),
            children: Vec::new(),
        }
    }

    /// A container without a page of its own, gated by `module`
    #[must_use]
    pub fn group(title: &str, icon: &str, module: &str, children: Vec<Self>) -> Self {
        Self {
            title: title.to_string(),
            path: None,
            icon: icon.to_string(),
            module_name: Some(module.to_string()),
            children,
        }
    }

    /// Attach children to a link, making it a group with a direct page
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Whether the entry has a page of its own
    #[must_use]
    pub const fn is_direct_link(&self) -> bool {
        self.path.is_some()
    }
}

/// The full sidebar, in display order
///
/// The first entry is always the dashboard.
#[must_use]
pub fn default_tree() -> Vec<NavItem> {
    vec![
        NavItem::link("Dashboard", "/dashboard", "dashboard", modules::DASHBOARD),
        NavItem::link("Users", "/users", "people", modules::USERS),
        NavItem::group(
            "Partners",
            "handshake",
            modules::PARTNERS,
            vec![
                NavItem::link("Partner List", "/partners", "store", modules::PARTNERS),
                NavItem::link("Sub Users", "/sub-users", "group", modules::SUB_USERS),
            ],
        ),
        NavItem::group(
            "Access Control",
            "shield",
            modules::ROLES,
            vec![
                NavItem::link("Roles", "/roles", "badge", modules::ROLES),
                NavItem::link(
                    "Role Permissions",
                    "/roles/permissions",
                    "key",
                    modules::ROLE_PERMISSIONS,
                ),
            ],
        ),
        NavItem::link("Property", "/property", "apartment", modules::PROPERTY).with_children(vec![
            NavItem::link(
                "Establishment Types",
                "/establishment",
                "domain",
                modules::ESTABLISHMENT,
            ),
            NavItem::link(
                "Space Types",
                "/property/space-types",
                "meeting_room",
                modules::SPACE_TYPES,
            ),
            NavItem::link("Amenities", "/amenities", "wifi", modules::AMENITIES),
        ]),
        NavItem::link("Blogs", "/blogs", "article", modules::BLOGS),
        NavItem::link("Jobs", "/jobs", "work", modules::JOBS),
        NavItem::link("Payments", "/payments", "payments", modules::PAYMENTS),
        NavItem::link(
            "Notifications",
            "/notifications",
            "notifications",
            modules::NOTIFICATIONS,
        ),
        NavItem::link("Support", "/support", "support_agent", modules::SUPPORT),
    ]
}

/// Keep only the entries the session may see
///
/// The first entry (the dashboard) is kept unconditionally. Every other entry
/// needs `view` on its module; an entry without a module is never shown.
/// Children of a kept group are filtered by the same rule, and a group left
/// without children is dropped unless it links to a page itself. Source
/// order is preserved.
#[must_use]
pub fn filter_navigation(tree: &[NavItem], permissions: &[ModulePermission]) -> Vec<NavItem> {
    let mut items = tree.iter();
    let mut visible = Vec::with_capacity(tree.len());

    if let Some(first) = items.next() {
        visible.push(first.clone());
    }

    visible.extend(items.filter_map(|item| filter_item(item, permissions)));
    visible
}

fn filter_item(item: &NavItem, permissions: &[ModulePermission]) -> Option<NavItem> {
    let module = item.module_name.as_deref()?;
    if !has_permission(permissions, module, PermissionAction::View) {
        return None;
    }

    if item.children.is_empty() {
        return Some(item.clone());
    }

    let children: Vec<NavItem> = item
        .children
        .iter()
        .filter_map(|child| filter_item(child, permissions))
        .collect();

    if children.is_empty() && !item.is_direct_link() {
        return None;
    }

    Some(NavItem {
        children,
        ..item.clone()
    })
}

/// Find the module gating `path` in the tree, preferring the longest match
#[must_use]
pub fn module_for_path<'a>(tree: &'a [NavItem], path: &str) -> Option<&'a str> {
    fn walk<'a>(items: &'a [NavItem], path: &str, best: &mut Option<(usize, &'a str)>) {
        for item in items {
            if let (Some(route), Some(module)) = (item.path.as_deref(), item.module_name.as_deref())
            {
                let matches = path == route
                    || path
                        .strip_prefix(route)
                        .is_some_and(|rest| rest.starts_with('/'));
                if matches && best.is_none_or(|(len, _)| route.len() > len) {
                    *best = Some((route.len(), module));
                }
            }
            walk(&item.children, path, best);
        }
    }

    let mut best = None;
    walk(tree, path, &mut best);
    best.map(|(_, module)| module)
}
