//! Marketplace users

use super::{Resource, Toggleable};
use spaceadmin_core::ListShape;
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::User;

/// Users registered on the marketplace; listed and activated, never edited
#[derive(Debug, Clone, Copy)]
pub struct Users;

impl Resource for Users {
    const NAME: &'static str = "user";
    const MODULE: &'static str = modules::USERS;
    const BASE: &'static str = "/user";
    const ROUTE: &'static str = "/users";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = User;
}

impl Toggleable for Users {}
