//! Wire model for the directory's person records (People API v1 JSON).
//!
//! Only the field groups the contact model reads or writes are typed; any
//! other member of a person object is kept verbatim in `extra` so the
//! details pane can still show it.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Field groups requested on bulk load.
pub const PERSON_FIELDS: &[&str] = &[
    "names",
    "birthdays",
    "organizations",
    "urls",
    "userDefined",
];

/// Custom key holding the engagement tier.
pub const TIER_KEY: &str = "Tier";
/// Custom key holding the last contact date (`YYYY-MM-DD`).
pub const LAST_CONTACT_DATE_KEY: &str = "LastContactDate";
/// Custom key holding the last contact note.
pub const LAST_CONTACT_NOTE_KEY: &str = "LastContactNote";

/// URL `type` written for professional-profile links.
pub const PROFILE_URL_TYPE: &str = "LinkedIn";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePerson {
    #[serde(default)]
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<PersonName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub birthdays: Vec<PersonBirthday>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<PersonOrganization>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<PersonUrl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_defined: Vec<UserDefined>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unstructured_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

impl PersonName {
    /// Name entry for a free-form display name.
    pub fn unstructured(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: Some(name.clone()),
            unstructured_name: Some(name),
            given_name: None,
            family_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBirthday {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateParts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Calendar date as the directory stores it; year 0 means "year unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonOrganization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonUrl {
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefined {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl UserDefined {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One page of `people/me/connections`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsPage {
    #[serde(default)]
    pub connections: Vec<RemotePerson>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_people: Option<u32>,
}
