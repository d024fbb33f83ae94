//! Staged remote changes for one contact.
//!
//! The directory replaces whole field groups on update, so each staged
//! group carries its complete replacement value. Custom key/value entries
//! are upserted against the list seen at load time; unrelated keys ride
//! along unchanged.

use serde::Serialize;

use crate::people::DateParts;
use crate::people::PersonBirthday;
use crate::people::PersonName;
use crate::people::PersonOrganization;
use crate::people::PersonUrl;
use crate::people::UserDefined;

/// A remote field group, named as the directory's update mask expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldGroup {
    Names,
    Birthdays,
    Organizations,
    Urls,
    UserDefined,
}

impl FieldGroup {
    pub fn mask_name(self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::Birthdays => "birthdays",
            Self::Organizations => "organizations",
            Self::Urls => "urls",
            Self::UserDefined => "userDefined",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPatch {
    base_custom: Vec<UserDefined>,
    names: Option<Vec<PersonName>>,
    birthdays: Option<Vec<PersonBirthday>>,
    organizations: Option<Vec<PersonOrganization>>,
    urls: Option<Vec<PersonUrl>>,
    custom: Option<Vec<UserDefined>>,
}

/// Request body for an update: the etag plus the staged groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<&'a [PersonName]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdays: Option<&'a [PersonBirthday]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<&'a [PersonOrganization]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<&'a [PersonUrl]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_defined: Option<&'a [UserDefined]>,
}

impl PendingPatch {
    pub(crate) fn new(base_custom: Vec<UserDefined>) -> Self {
        Self {
            base_custom,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups().is_empty()
    }

    /// Staged groups in mask order.
    pub fn groups(&self) -> Vec<FieldGroup> {
        let mut groups = Vec::new();
        if self.names.is_some() {
            groups.push(FieldGroup::Names);
        }
        if self.birthdays.is_some() {
            groups.push(FieldGroup::Birthdays);
        }
        if self.organizations.is_some() {
            groups.push(FieldGroup::Organizations);
        }
        if self.urls.is_some() {
            groups.push(FieldGroup::Urls);
        }
        if self.custom.is_some() {
            groups.push(FieldGroup::UserDefined);
        }
        groups
    }

    /// Comma-separated update mask, e.g. `birthdays,userDefined`.
    pub fn update_mask(&self) -> String {
        self.groups()
            .into_iter()
            .map(FieldGroup::mask_name)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn body<'a>(&'a self, etag: Option<&'a str>) -> PatchBody<'a> {
        PatchBody {
            etag,
            names: self.names.as_deref(),
            birthdays: self.birthdays.as_deref(),
            organizations: self.organizations.as_deref(),
            urls: self.urls.as_deref(),
            user_defined: self.custom.as_deref(),
        }
    }

    /// Custom entries as they will look remotely after the next push.
    pub fn custom_entries(&self) -> &[UserDefined] {
        self.custom.as_deref().unwrap_or(&self.base_custom)
    }

    pub(crate) fn replace_name(&mut self, name: &str) {
        self.names = Some(vec![PersonName::unstructured(name)]);
    }

    pub(crate) fn replace_birthday(&mut self, date: DateParts) {
        self.birthdays = Some(vec![PersonBirthday {
            date: Some(date),
            text: None,
        }]);
    }

    pub(crate) fn replace_organization(&mut self, name: &str) {
        self.organizations = Some(vec![PersonOrganization {
            name: Some(name.to_string()),
        }]);
    }

    pub(crate) fn replace_urls(&mut self, url: Option<PersonUrl>) {
        self.urls = Some(url.into_iter().collect());
    }

    /// Update every entry with `key` in place, or append one.
    pub(crate) fn upsert_custom(&mut self, key: &str, value: &str) {
        let entries = self
            .custom
            .get_or_insert_with(|| self.base_custom.clone());
        let mut found = false;
        for entry in entries.iter_mut().filter(|e| e.key == key) {
            entry.value = value.to_string();
            found = true;
        }
        if !found {
            entries.push(UserDefined::new(key, value));
        }
    }

    /// Fold staged custom entries into the baseline and clear every group.
    pub(crate) fn commit(&mut self) {
        if let Some(custom) = self.custom.take() {
            self.base_custom = custom;
        }
        self.names = None;
        self.birthdays = None;
        self.organizations = None;
        self.urls = None;
    }
}
