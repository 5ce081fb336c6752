use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, RowId};

/// Account details of the signed-in partner (organizer) or attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: RowId,
    #[serde(default, alias = "organization_name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "profile_picture")]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
}
