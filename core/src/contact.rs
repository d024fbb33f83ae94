//! The validated local contact record.
//!
//! A [`ContactRecord`] is created only by the translator and mutated only
//! through the field registry in [`crate::fields`]. Dates are held as
//! [`NaiveDate`] so the canonical text forms are always re-derivable.

use std::fmt;

use chrono::NaiveDate;

use crate::patch::PendingPatch;
use crate::people::RemotePerson;

/// Canonical birthday format (`MM/DD/YYYY`).
pub const BIRTHDAY_FORMAT: &str = "%m/%d/%Y";
/// Canonical last-contact format (`YYYY-MM-DD`).
pub const LAST_CONTACT_FORMAT: &str = "%Y-%m-%d";

pub(crate) const BIRTHDAY_FORMAT_LABEL: &str = "MM/DD/YYYY";
pub(crate) const LAST_CONTACT_FORMAT_LABEL: &str = "YYYY-MM-DD";

/// Desired contact cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EngagementTier {
    #[default]
    NoEffort,
    Yearly,
    Quarterly,
    Active,
    Ignore,
}

impl EngagementTier {
    pub const ALL: [EngagementTier; 5] = [
        EngagementTier::NoEffort,
        EngagementTier::Yearly,
        EngagementTier::Quarterly,
        EngagementTier::Active,
        EngagementTier::Ignore,
    ];

    /// Numeric code stored in the directory.
    pub fn code(self) -> u8 {
        match self {
            Self::NoEffort => 0,
            Self::Yearly => 1,
            Self::Quarterly => 2,
            Self::Active => 3,
            Self::Ignore => 9,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NoEffort),
            1 => Some(Self::Yearly),
            2 => Some(Self::Quarterly),
            3 => Some(Self::Active),
            9 => Some(Self::Ignore),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NoEffort => "No effort",
            Self::Yearly => "Yearly effort",
            Self::Quarterly => "Quarterly effort",
            Self::Active => "Active",
            Self::Ignore => "Ignore",
        }
    }
}

impl fmt::Display for EngagementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reference from a local record to its directory counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHandle {
    resource_name: String,
    etag: Option<String>,
}

impl IdentityHandle {
    pub fn new(resource_name: impl Into<String>, etag: Option<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            etag,
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub(crate) fn set_etag(&mut self, etag: Option<String>) {
        if etag.is_some() {
            self.etag = etag;
        }
    }
}

/// One address-book entry.
#[derive(Debug, Clone)]
pub struct ContactRecord {
    pub(crate) handle: IdentityHandle,
    pub(crate) display_name: String,
    pub(crate) birthday: Option<NaiveDate>,
    pub(crate) relationship_label: String,
    pub(crate) profile_url: String,
    pub(crate) tier: EngagementTier,
    pub(crate) last_contact_date: Option<NaiveDate>,
    pub(crate) last_contact_note: String,
    pub(crate) snapshot: RemotePerson,
    pub(crate) pending: PendingPatch,
}

impl ContactRecord {
    pub fn handle(&self) -> &IdentityHandle {
        &self.handle
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    /// Birthday in `MM/DD/YYYY`, or empty when unset.
    pub fn birthday_text(&self) -> String {
        self.birthday
            .map(|d| d.format(BIRTHDAY_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn relationship_label(&self) -> &str {
        &self.relationship_label
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    pub fn tier(&self) -> EngagementTier {
        self.tier
    }

    pub fn last_contact_date(&self) -> Option<NaiveDate> {
        self.last_contact_date
    }

    /// Last contact date in `YYYY-MM-DD`, or empty when unset.
    pub fn last_contact_date_text(&self) -> String {
        self.last_contact_date
            .map(|d| d.format(LAST_CONTACT_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn last_contact_note(&self) -> &str {
        &self.last_contact_note
    }

    /// The directory record as last seen from the service.
    pub fn remote_snapshot(&self) -> &RemotePerson {
        &self.snapshot
    }

    /// Field groups staged since the last successful push.
    pub fn pending_patch(&self) -> &PendingPatch {
        &self.pending
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Adopt the directory's response to a successful push: refresh the
    /// etag and snapshot, and fold the staged groups into the baseline.
    pub fn mark_pushed(&mut self, updated: RemotePerson) {
        self.handle.set_etag(updated.etag.clone());
        self.pending.commit();
        self.snapshot = updated;
    }
}

/// Strict parse: the value must be exactly the canonical rendering.
pub(crate) fn parse_canonical_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, format).ok()?;
    (date.format(format).to_string() == raw).then_some(date)
}
