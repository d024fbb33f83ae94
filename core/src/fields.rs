//! The field update protocol.
//!
//! Each editable column is registered once in [`FIELD_RULES`] with a
//! validator that turns raw text into a typed [`FieldEdit`]. A
//! `FieldEdit` knows how to mutate the local record and how to stage the
//! matching remote group, so validation always completes before anything
//! is touched.

use chrono::Datelike;
use chrono::NaiveDate;
use strum_macros::Display;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;

use crate::contact::BIRTHDAY_FORMAT;
use crate::contact::BIRTHDAY_FORMAT_LABEL;
use crate::contact::ContactRecord;
use crate::contact::EngagementTier;
use crate::contact::LAST_CONTACT_FORMAT;
use crate::contact::LAST_CONTACT_FORMAT_LABEL;
use crate::contact::parse_canonical_date;
use crate::error::ValidationError;
use crate::people::DateParts;
use crate::people::LAST_CONTACT_DATE_KEY;
use crate::people::LAST_CONTACT_NOTE_KEY;
use crate::people::PROFILE_URL_TYPE;
use crate::people::PersonUrl;
use crate::people::TIER_KEY;

/// Table columns, in display order. The string forms are the column
/// headers and the names accepted by [`update`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum Field {
    #[strum(serialize = "Name")]
    Name,
    #[strum(serialize = "Birthday")]
    Birthday,
    #[strum(serialize = "How I Know Them")]
    Relationship,
    #[strum(serialize = "Tier")]
    Tier,
    #[strum(serialize = "Last Contact Date")]
    LastContactDate,
    #[strum(serialize = "Last Contact Note")]
    LastContactNote,
    #[strum(serialize = "LinkedIn URL")]
    ProfileUrl,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Birthday,
        Field::Relationship,
        Field::Tier,
        Field::LastContactDate,
        Field::LastContactNote,
        Field::ProfileUrl,
    ];

    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn header(self) -> &'static str {
        self.into()
    }

    /// Current value of this field rendered as table text.
    pub fn text(self, record: &ContactRecord) -> String {
        match self {
            Field::Name => record.display_name().to_string(),
            Field::Birthday => record.birthday_text(),
            Field::Relationship => record.relationship_label().to_string(),
            Field::Tier => record.tier().to_string(),
            Field::LastContactDate => record.last_contact_date_text(),
            Field::LastContactNote => record.last_contact_note().to_string(),
            Field::ProfileUrl => record.profile_url().to_string(),
        }
    }
}

/// A validated value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Birthday(NaiveDate),
    Relationship(String),
    Tier(EngagementTier),
    LastContactDate(NaiveDate),
    LastContactNote(String),
    ProfileUrl(String),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            Self::Name(_) => Field::Name,
            Self::Birthday(_) => Field::Birthday,
            Self::Relationship(_) => Field::Relationship,
            Self::Tier(_) => Field::Tier,
            Self::LastContactDate(_) => Field::LastContactDate,
            Self::LastContactNote(_) => Field::LastContactNote,
            Self::ProfileUrl(_) => Field::ProfileUrl,
        }
    }

    /// Mutate the local record and stage the remote group together.
    pub fn apply(self, record: &mut ContactRecord) {
        let patch = &mut record.pending;
        match self {
            Self::Name(name) => {
                patch.replace_name(&name);
                record.display_name = name;
            }
            Self::Birthday(date) => {
                patch.replace_birthday(DateParts {
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                });
                record.birthday = Some(date);
            }
            Self::Relationship(label) => {
                patch.replace_organization(&label);
                record.relationship_label = label;
            }
            Self::Tier(tier) => {
                patch.upsert_custom(TIER_KEY, &tier.to_string());
                record.tier = tier;
            }
            Self::LastContactDate(date) => {
                patch.upsert_custom(
                    LAST_CONTACT_DATE_KEY,
                    &date.format(LAST_CONTACT_FORMAT).to_string(),
                );
                record.last_contact_date = Some(date);
            }
            Self::LastContactNote(note) => {
                patch.upsert_custom(LAST_CONTACT_NOTE_KEY, &note);
                record.last_contact_note = note;
            }
            Self::ProfileUrl(url) => {
                let entry = (!url.is_empty()).then(|| PersonUrl {
                    value: url.clone(),
                    kind: Some(PROFILE_URL_TYPE.to_string()),
                });
                patch.replace_urls(entry);
                record.profile_url = url;
            }
        }
    }
}

/// Registry entry: one per editable column.
pub struct FieldRule {
    pub field: Field,
    pub validate: fn(&str) -> Result<FieldEdit, ValidationError>,
}

pub static FIELD_RULES: [FieldRule; 7] = [
    FieldRule {
        field: Field::Name,
        validate: validate_name,
    },
    FieldRule {
        field: Field::Birthday,
        validate: validate_birthday,
    },
    FieldRule {
        field: Field::Relationship,
        validate: validate_relationship,
    },
    FieldRule {
        field: Field::Tier,
        validate: validate_tier,
    },
    FieldRule {
        field: Field::LastContactDate,
        validate: validate_last_contact_date,
    },
    FieldRule {
        field: Field::LastContactNote,
        validate: validate_last_contact_note,
    },
    FieldRule {
        field: Field::ProfileUrl,
        validate: validate_profile_url,
    },
];

pub fn rule_for(field: Field) -> &'static FieldRule {
    &FIELD_RULES[field.index()]
}

/// Resolve a column header to its rule.
pub fn lookup(field_name: &str) -> Result<&'static FieldRule, ValidationError> {
    field_name
        .parse::<Field>()
        .map(rule_for)
        .map_err(|_| ValidationError::UnknownField(field_name.to_string()))
}

/// Validate `raw` for `field_name` without touching any record.
pub fn validate(field_name: &str, raw: &str) -> Result<FieldEdit, ValidationError> {
    (lookup(field_name)?.validate)(raw)
}

/// Validate, then mutate `record` and stage its remote patch.
/// On error the record is left exactly as it was.
pub fn update(
    record: &mut ContactRecord,
    field_name: &str,
    raw: &str,
) -> Result<(), ValidationError> {
    let edit = validate(field_name, raw)?;
    tracing::debug!(
        contact = record.display_name(),
        field = %edit.field(),
        "applying field edit"
    );
    edit.apply(record);
    Ok(())
}

fn validate_name(raw: &str) -> Result<FieldEdit, ValidationError> {
    Ok(FieldEdit::Name(raw.to_string()))
}

fn validate_relationship(raw: &str) -> Result<FieldEdit, ValidationError> {
    Ok(FieldEdit::Relationship(raw.to_string()))
}

fn validate_last_contact_note(raw: &str) -> Result<FieldEdit, ValidationError> {
    Ok(FieldEdit::LastContactNote(raw.to_string()))
}

fn validate_profile_url(raw: &str) -> Result<FieldEdit, ValidationError> {
    Ok(FieldEdit::ProfileUrl(raw.to_string()))
}

fn validate_birthday(raw: &str) -> Result<FieldEdit, ValidationError> {
    parse_canonical_date(raw, BIRTHDAY_FORMAT)
        .map(FieldEdit::Birthday)
        .ok_or_else(|| ValidationError::InvalidDate {
            field: Field::Birthday,
            value: raw.to_string(),
            expected: BIRTHDAY_FORMAT_LABEL,
        })
}

fn validate_last_contact_date(raw: &str) -> Result<FieldEdit, ValidationError> {
    parse_canonical_date(raw, LAST_CONTACT_FORMAT)
        .map(FieldEdit::LastContactDate)
        .ok_or_else(|| ValidationError::InvalidDate {
            field: Field::LastContactDate,
            value: raw.to_string(),
            expected: LAST_CONTACT_FORMAT_LABEL,
        })
}

fn validate_tier(raw: &str) -> Result<FieldEdit, ValidationError> {
    let code: i64 = raw
        .parse()
        .map_err(|_| ValidationError::TierNotNumeric(raw.to_string()))?;
    EngagementTier::from_code(code)
        .map(FieldEdit::Tier)
        .ok_or(ValidationError::TierOutOfRange(code))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::patch::FieldGroup;
    use crate::people::RemotePerson;
    use crate::people::UserDefined;
    use crate::translate::translate;
    use pretty_assertions::assert_eq;

    fn record() -> ContactRecord {
        let person: RemotePerson = serde_json::from_value(serde_json::json!({
            "resourceName": "people/c1",
            "etag": "e1",
            "names": [{ "displayName": "Ada" }],
            "urls": [{ "value": "https://example.com/ada" }],
            "userDefined": [{ "key": "Tier", "value": "1" }]
        }))
        .unwrap();
        translate(person).unwrap().record
    }

    #[test]
    fn registry_order_matches_columns() {
        for (index, rule) in FIELD_RULES.iter().enumerate() {
            assert_eq!(rule.field.index(), index);
            assert_eq!(Field::from_index(index), Some(rule.field));
        }
        assert_eq!(Field::from_index(7), None);
    }

    #[test]
    fn headers_parse_back_to_fields() {
        for field in Field::ALL {
            assert_eq!(field.header().parse::<Field>().unwrap(), field);
        }
        assert_eq!(Field::Relationship.header(), "How I Know Them");
        assert_eq!(Field::ProfileUrl.to_string(), "LinkedIn URL");
    }

    #[test]
    fn birthday_round_trips() {
        let mut rec = record();
        for raw in ["01/31/1999", "12/01/2000", "02/29/2024", "07/04/0000"] {
            update(&mut rec, "Birthday", raw).unwrap();
            assert_eq!(rec.birthday_text(), raw);
        }
        assert_eq!(rec.pending_patch().groups(), vec![FieldGroup::Birthdays]);
    }

    #[test]
    fn bad_birthday_changes_nothing() {
        let mut rec = record();
        let err = update(&mut rec, "Birthday", "1999-01-31").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { field: Field::Birthday, .. }));
        assert_eq!(rec.birthday(), None);
        assert!(!rec.has_pending_changes());
    }

    #[test]
    fn non_numeric_tier_is_rejected() {
        let mut rec = record();
        let err = update(&mut rec, "Tier", "often").unwrap_err();
        assert_eq!(err, ValidationError::TierNotNumeric("often".to_string()));
        assert_eq!(rec.tier(), EngagementTier::Yearly);
        assert!(!rec.has_pending_changes());
    }

    #[test]
    fn tier_outside_closed_set_is_rejected() {
        let mut rec = record();
        assert_eq!(
            update(&mut rec, "Tier", "5").unwrap_err(),
            ValidationError::TierOutOfRange(5)
        );
        assert_eq!(rec.tier(), EngagementTier::Yearly);
    }

    #[test]
    fn tier_upserts_existing_custom_key() {
        let mut rec = record();
        update(&mut rec, "Tier", "9").unwrap();
        assert_eq!(rec.tier(), EngagementTier::Ignore);
        assert_eq!(
            rec.pending_patch().custom_entries(),
            &[UserDefined::new("Tier", "9")]
        );
    }

    #[test]
    fn unknown_field_mutates_nothing() {
        let mut rec = record();
        let before = rec.display_name().to_string();
        let err = update(&mut rec, "Email", "ada@example.com").unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("Email".to_string()));
        assert_eq!(rec.display_name(), before);
        assert!(!rec.has_pending_changes());
    }

    #[test]
    fn last_contact_fields_share_the_custom_group() {
        let mut rec = record();
        update(&mut rec, "Last Contact Date", "2025-03-14").unwrap();
        update(&mut rec, "Last Contact Note", "lunch").unwrap();

        assert_eq!(rec.last_contact_date_text(), "2025-03-14");
        assert_eq!(rec.last_contact_note(), "lunch");
        assert_eq!(rec.pending_patch().update_mask(), "userDefined");
        assert_eq!(
            rec.pending_patch().custom_entries(),
            &[
                UserDefined::new("Tier", "1"),
                UserDefined::new("LastContactDate", "2025-03-14"),
                UserDefined::new("LastContactNote", "lunch"),
            ]
        );
    }

    #[test]
    fn bad_last_contact_date_is_rejected() {
        let mut rec = record();
        assert!(update(&mut rec, "Last Contact Date", "03/14/2025").is_err());
        assert_eq!(rec.last_contact_date(), None);
        assert!(!rec.has_pending_changes());
    }

    #[test]
    fn empty_url_clears_the_url_group() {
        let mut rec = record();
        update(&mut rec, "LinkedIn URL", "").unwrap();
        assert_eq!(rec.profile_url(), "");

        let body = serde_json::to_value(rec.pending_patch().body(None)).unwrap();
        assert_eq!(body, serde_json::json!({ "urls": [] }));
    }

    #[test]
    fn url_is_tagged_as_profile_link() {
        let mut rec = record();
        update(&mut rec, "LinkedIn URL", "https://linkedin.com/in/ada").unwrap();
        let body = serde_json::to_value(rec.pending_patch().body(None)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "urls": [{ "value": "https://linkedin.com/in/ada", "type": "LinkedIn" }]
            })
        );
    }

    #[test]
    fn name_and_relationship_replace_their_groups() {
        let mut rec = record();
        update(&mut rec, "Name", "Ada King").unwrap();
        update(&mut rec, "How I Know Them", "Analytical Society").unwrap();

        assert_eq!(rec.display_name(), "Ada King");
        assert_eq!(rec.relationship_label(), "Analytical Society");
        assert_eq!(
            rec.pending_patch().groups(),
            vec![FieldGroup::Names, FieldGroup::Organizations]
        );
    }
}
