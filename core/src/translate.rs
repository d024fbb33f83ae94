//! Remote person → local contact translation.

use std::fmt;

use chrono::NaiveDate;

use crate::contact::ContactRecord;
use crate::contact::EngagementTier;
use crate::contact::IdentityHandle;
use crate::contact::LAST_CONTACT_FORMAT;
use crate::contact::parse_canonical_date;
use crate::fields::Field;
use crate::patch::PendingPatch;
use crate::people::LAST_CONTACT_DATE_KEY;
use crate::people::LAST_CONTACT_NOTE_KEY;
use crate::people::RemotePerson;
use crate::people::TIER_KEY;

/// A stored remote value that does not satisfy the local invariants.
/// The field falls back to its unset/default value locally; the remote
/// value is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAnomaly {
    pub contact: String,
    pub field: Field,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for DataAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} \"{}\" ignored ({})",
            self.contact, self.field, self.value, self.reason
        )
    }
}

/// A translated record plus anything odd noticed on the way.
#[derive(Debug, Clone)]
pub struct Translated {
    pub record: ContactRecord,
    pub anomalies: Vec<DataAnomaly>,
}

/// Outcome of translating a whole bulk load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<ContactRecord>,
    pub skipped_unnamed: usize,
    pub anomalies: Vec<DataAnomaly>,
}

/// Translate one remote person. Persons without a usable primary name are
/// not representable and yield `None`.
pub fn translate(remote: RemotePerson) -> Option<Translated> {
    let display_name = primary_name(&remote)?;
    let mut anomalies = Vec::new();
    let mut note = |field: Field, value: String, reason: &'static str| {
        anomalies.push(DataAnomaly {
            contact: display_name.clone(),
            field,
            value,
            reason,
        });
    };

    let birthday = match remote.birthdays.first().and_then(|b| b.date) {
        Some(parts) => {
            let date = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day);
            if date.is_none() {
                note(
                    Field::Birthday,
                    format!("{:02}/{:02}/{:04}", parts.month, parts.day, parts.year),
                    "not a calendar date",
                );
            }
            date
        }
        None => None,
    };

    let relationship_label = remote
        .organizations
        .first()
        .and_then(|o| o.name.clone())
        .unwrap_or_default();
    let profile_url = remote
        .urls
        .first()
        .map(|u| u.value.clone())
        .unwrap_or_default();

    let mut raw_tier = None;
    let mut raw_last_contact = None;
    let mut last_contact_note = String::new();
    for entry in &remote.user_defined {
        match entry.key.as_str() {
            TIER_KEY => raw_tier = Some(entry.value.as_str()),
            LAST_CONTACT_DATE_KEY => raw_last_contact = Some(entry.value.as_str()),
            LAST_CONTACT_NOTE_KEY => last_contact_note = entry.value.clone(),
            _ => {}
        }
    }

    let tier = match raw_tier {
        None | Some("") => EngagementTier::default(),
        Some(raw) => match raw.parse::<i64>().ok().and_then(EngagementTier::from_code) {
            Some(tier) => tier,
            None => {
                note(Field::Tier, raw.to_string(), "not one of 0, 1, 2, 3, 9");
                EngagementTier::default()
            }
        },
    };

    let last_contact_date = match raw_last_contact {
        None | Some("") => None,
        Some(raw) => {
            let date = parse_canonical_date(raw, LAST_CONTACT_FORMAT);
            if date.is_none() {
                note(Field::LastContactDate, raw.to_string(), "expected YYYY-MM-DD");
            }
            date
        }
    };

    let record = ContactRecord {
        handle: IdentityHandle::new(remote.resource_name.clone(), remote.etag.clone()),
        display_name,
        birthday,
        relationship_label,
        profile_url,
        tier,
        last_contact_date,
        last_contact_note,
        pending: PendingPatch::new(remote.user_defined.clone()),
        snapshot: remote,
    };
    Some(Translated { record, anomalies })
}

/// Translate a bulk load, dropping unnamed persons and collecting anomalies.
pub fn translate_all(remotes: impl IntoIterator<Item = RemotePerson>) -> LoadReport {
    let mut report = LoadReport::default();
    for remote in remotes {
        let resource_name = remote.resource_name.clone();
        match translate(remote) {
            Some(translated) => {
                for anomaly in &translated.anomalies {
                    tracing::warn!(resource = %resource_name, "{anomaly}");
                }
                report.anomalies.extend(translated.anomalies);
                report.records.push(translated.record);
            }
            None => {
                tracing::debug!(resource = %resource_name, "skipping person without a name");
                report.skipped_unnamed += 1;
            }
        }
    }
    report
}

fn primary_name(remote: &RemotePerson) -> Option<String> {
    let name = remote.names.first()?;
    [name.display_name.as_deref(), name.unstructured_name.as_deref()]
        .into_iter()
        .flatten()
        .find(|n| !n.trim().is_empty())
        .map(str::to_string)
}
