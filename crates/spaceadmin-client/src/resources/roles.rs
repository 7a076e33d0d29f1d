//! Roles and the role permission matrix

use super::{Creatable, Editable, Resource};
use spaceadmin_core::ListShape;
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::{Role, RoleDraft, RolePermission, RolePermissionDraft};

/// Administrative roles
#[derive(Debug, Clone, Copy)]
pub struct Roles;

impl Resource for Roles {
    const NAME: &'static str = "role";
    const MODULE: &'static str = modules::ROLES;
    const BASE: &'static str = "/role";
    const ROUTE: &'static str = "/roles";
    const LIST_SHAPE: ListShape = ListShape::Bare;

    type Record = Role;
}

impl Creatable for Roles {
    type Draft = RoleDraft;
}

impl Editable for Roles {}

/// Permission matrices, one per user type
///
/// The matrix of a single user type is read through
/// [`crate::permissions::PermissionApi`].
#[derive(Debug, Clone, Copy)]
pub struct RolePermissions;

impl Resource for RolePermissions {
    const NAME: &'static str = "role permission";
    const MODULE: &'static str = modules::ROLE_PERMISSIONS;
    const BASE: &'static str = "/role-permission";
    const ROUTE: &'static str = "/roles/permissions";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = RolePermission;
}

impl Creatable for RolePermissions {
    type Draft = RolePermissionDraft;
}

impl Editable for RolePermissions {}
