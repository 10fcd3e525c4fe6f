//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    /// Unique handle shown in profile URLs
    pub username: String,
    /// Display name
    pub name: String,
    /// Profile picture URL
    #[serde(default)]
    pub image: Option<String>,
    /// Free-form profile text
    #[serde(default)]
    pub bio: Option<String>,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}
