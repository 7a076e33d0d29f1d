//! Properties and the lookups describing them

use super::{Creatable, Editable, Resource};
use spaceadmin_core::ListShape;
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::{
    EstablishmentType, NamedDraft, Property, PropertyCategory, PropertyDraft, SpaceSubType,
    SpaceSubTypeDraft, SpaceType,
};

/// Properties listed by partners; filterable by city
#[derive(Debug, Clone, Copy)]
pub struct Properties;

impl Resource for Properties {
    const NAME: &'static str = "property";
    const MODULE: &'static str = modules::PROPERTY;
    const BASE: &'static str = "/property";
    const ROUTE: &'static str = "/property";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = Property;
}

impl Creatable for Properties {
    type Draft = PropertyDraft;
}

impl Editable for Properties {}

/// Property categories, read only
#[derive(Debug, Clone, Copy)]
pub struct PropertyCategories;

impl Resource for PropertyCategories {
    const NAME: &'static str = "property category";
    const MODULE: &'static str = modules::PROPERTY;
    const BASE: &'static str = "/property/category";
    const ROUTE: &'static str = "/property/categories";
    const LIST_SHAPE: ListShape = ListShape::Bare;

    type Record = PropertyCategory;
}

/// Establishment types
#[derive(Debug, Clone, Copy)]
pub struct EstablishmentTypes;

impl Resource for EstablishmentTypes {
    const NAME: &'static str = "establishment type";
    const MODULE: &'static str = modules::ESTABLISHMENT;
    const BASE: &'static str = "/workspace/establishment-type";
    const ROUTE: &'static str = "/establishment";
    const LIST_SHAPE: ListShape = ListShape::Bare;

    type Record = EstablishmentType;
}

impl Creatable for EstablishmentTypes {
    type Draft = NamedDraft;
}

impl Editable for EstablishmentTypes {}

/// Space types
#[derive(Debug, Clone, Copy)]
pub struct SpaceTypes;

impl Resource for SpaceTypes {
    const NAME: &'static str = "space type";
    const MODULE: &'static str = modules::SPACE_TYPES;
    const BASE: &'static str = "/property/category/space-type";
    const ROUTE: &'static str = "/property/space-types";
    const LIST_SHAPE: ListShape = ListShape::Bare;

    type Record = SpaceType;
}

impl Creatable for SpaceTypes {
    type Draft = NamedDraft;
}

impl Editable for SpaceTypes {}

/// Space sub-types
#[derive(Debug, Clone, Copy)]
pub struct SpaceSubTypes;

impl Resource for SpaceSubTypes {
    const NAME: &'static str = "space sub-type";
    const MODULE: &'static str = modules::SPACE_TYPES;
    const BASE: &'static str = "/property/category/sub-type";
    const ROUTE: &'static str = "/property/space-types/sub-types";
    const LIST_SHAPE: ListShape = ListShape::Bare;

    type Record = SpaceSubType;
}

impl Creatable for SpaceSubTypes {
    type Draft = SpaceSubTypeDraft;
}

impl Editable for SpaceSubTypes {}
