//! Marketplace records and the payloads used to create or edit them
//!
//! Records are owned by the backend. The client only holds transient copies
//! for display and edit. Drafts carry the minimal form checks run before a
//! submit.

use crate::permission::ModulePermission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Backend record identifier
pub type RecordId = String;

/// Activation status shared by most records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Visible and usable
    #[default]
    Active,
    /// Disabled by an administrator
    Inactive,
    /// Awaiting review
    Pending,
    /// Draft (blogs, jobs)
    Draft,
    /// Published (blogs, jobs)
    Published,
    /// Anything the client does not know yet
    #[serde(other)]
    Unknown,
}

impl RecordStatus {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(crate::Error::validation(
                "status",
                format!("unknown status '{other}'"),
            )),
        }
    }
}

/// Body of a status update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// New status
    pub status: RecordStatus,
}

/// Login form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// User type the account signs in as
    pub user_type: i64,
}

/// Successful login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
    /// Signed-in account
    pub user: AdminUser,
}

/// The signed-in administrator, as stored in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Identifier
    pub id: RecordId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email
    pub email: String,
    /// User type driving the permission matrix
    #[serde(default)]
    pub user_type: Option<i64>,
    /// Role label
    #[serde(default)]
    pub role: Option<String>,
}

/// Marketplace user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identifier
    pub id: RecordId,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Email
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Account status
    #[serde(default)]
    pub status: RecordStatus,
    /// Registration time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partner (vendor) listing spaces on the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    /// Identifier
    pub id: RecordId,
    /// Contact name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Company name
    #[serde(default)]
    pub company_name: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Account status
    #[serde(default)]
    pub status: RecordStatus,
    /// Registration time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partner form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PartnerDraft {
    /// Contact name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Contact email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Enter a valid phone number"))]
    pub phone: Option<String>,
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Initial password, only on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Login belonging to a partner's team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubUser {
    /// Identifier
    pub id: RecordId,
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Owning partner
    #[serde(default)]
    pub vendor_id: Option<RecordId>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Sub-user form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubUserDraft {
    /// Name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Owning partner
    #[validate(length(min = 1, message = "Partner is required"))]
    pub vendor_id: RecordId,
    /// Initial password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Administrative role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Identifier
    pub id: RecordId,
    /// Role name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// User type the role maps to
    #[serde(default)]
    pub user_type: Option<i64>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Role form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoleDraft {
    /// Role name
    #[validate(length(min = 1, max = 100, message = "Role name is required"))]
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User type the role maps to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<i64>,
}

/// Permission matrix of one user type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Identifier
    pub id: RecordId,
    /// User type
    pub user_type: i64,
    /// Role label
    #[serde(default)]
    pub role_name: Option<String>,
    /// Per-module flags
    #[serde(default)]
    pub modules: Vec<ModulePermission>,
}

/// Role permission form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RolePermissionDraft {
    /// User type
    #[validate(range(min = 1, message = "User type is required"))]
    pub user_type: i64,
    /// Per-module flags
    #[validate(length(min = 1, message = "Select at least one module"))]
    pub modules: Vec<ModulePermission>,
}

/// Property listed by a partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Identifier
    pub id: RecordId,
    /// Title
    pub title: String,
    /// Category
    #[serde(default)]
    pub category_id: Option<RecordId>,
    /// Owning partner
    #[serde(default)]
    pub vendor_id: Option<RecordId>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// Price per unit
    #[serde(default)]
    pub price: Option<f64>,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Property form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyDraft {
    /// Title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
    /// Owning partner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<RecordId>,
    /// City
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    /// Street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Price per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Property category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCategory {
    /// Identifier
    pub id: RecordId,
    /// Name
    pub name: String,
}

/// Blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Identifier
    pub id: RecordId,
    /// Title
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Body
    #[serde(default)]
    pub content: Option<String>,
    /// Author
    #[serde(default)]
    pub author: Option<String>,
    /// Cover image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
    /// Publication time
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Blog form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BlogDraft {
    /// Title
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Body
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

/// Job opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Identifier
    pub id: RecordId,
    /// Title
    pub title: String,
    /// Location
    #[serde(default)]
    pub location: Option<String>,
    /// Full-time, part-time, contract...
    #[serde(default)]
    pub employment_type: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Job form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobDraft {
    /// Title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Employment type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    /// Description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

/// Kind of establishment (coworking, business centre...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentType {
    /// Identifier
    pub id: RecordId,
    /// Name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Kind of space within a property (desk, cabin, meeting room...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceType {
    /// Identifier
    pub id: RecordId,
    /// Name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Refinement of a space type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSubType {
    /// Identifier
    pub id: RecordId,
    /// Name
    pub name: String,
    /// Parent space type
    pub space_type_id: RecordId,
    /// Status
    #[serde(default)]
    pub status: RecordStatus,
}

/// Form for the simple named lookups (establishment and space types)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NamedDraft {
    /// Name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Space sub-type form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SpaceSubTypeDraft {
    /// Name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Parent space type
    #[validate(length(min = 1, message = "Space type is required"))]
    pub space_type_id: RecordId,
}
