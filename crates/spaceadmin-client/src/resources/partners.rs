//! Partners and their sub-users

use super::{Creatable, Editable, Resource, Toggleable};
use spaceadmin_core::ListShape;
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::{Partner, PartnerDraft, SubUser, SubUserDraft};

/// Vendors listing spaces
#[derive(Debug, Clone, Copy)]
pub struct Partners;

impl Resource for Partners {
    const NAME: &'static str = "partner";
    const MODULE: &'static str = modules::PARTNERS;
    const BASE: &'static str = "/vendor";
    const ROUTE: &'static str = "/partners";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = Partner;
}

impl Creatable for Partners {
    type Draft = PartnerDraft;
}

impl Editable for Partners {}

impl Toggleable for Partners {}

/// Logins on a partner's team; created and listed only
#[derive(Debug, Clone, Copy)]
pub struct SubUsers;

impl Resource for SubUsers {
    const NAME: &'static str = "sub-user";
    const MODULE: &'static str = modules::SUB_USERS;
    const BASE: &'static str = "/vendor/sub-user";
    const ROUTE: &'static str = "/sub-users";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = SubUser;
}

impl Creatable for SubUsers {
    type Draft = SubUserDraft;
}
