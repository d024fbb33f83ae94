//! Engagement status used to colour table rows.

use chrono::Datelike;
use chrono::Months;
use chrono::NaiveDate;

use crate::contact::ContactRecord;
use crate::contact::EngagementTier;

/// Months after the last contact before a yearly contact is overdue.
pub const YEARLY_CADENCE_MONTHS: u32 = 12;
/// Months after the last contact before a quarterly contact is overdue.
pub const QUARTERLY_CADENCE_MONTHS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Normal,
    /// Tier 0 contact whose birthday falls in the current month.
    Informational,
    /// Tracked contact with no last-contact date.
    MissingData,
    Overdue,
}

impl Status {
    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "Nothing to do",
            Self::Informational => "Birthday this month",
            Self::MissingData => "Missing last contact",
            Self::Overdue => "Overdue",
        }
    }
}

/// First matching rule wins.
pub fn classify(record: &ContactRecord, today: NaiveDate) -> Status {
    let tier = record.tier();
    let birthday_this_month = record
        .birthday()
        .is_some_and(|b| b.month() == today.month());

    if tier == EngagementTier::NoEffort && birthday_this_month {
        return Status::Informational;
    }

    let cadence = match tier {
        EngagementTier::Yearly => YEARLY_CADENCE_MONTHS,
        EngagementTier::Quarterly => QUARTERLY_CADENCE_MONTHS,
        _ => return Status::Normal,
    };

    match record.last_contact_date() {
        None => Status::MissingData,
        Some(last) if is_older_than(last, cadence, today) => Status::Overdue,
        Some(_) => Status::Normal,
    }
}

/// `date` advanced by `months` has been reached by `today`. A stored date
/// stands for the start of that day, so the anniversary itself is past due
/// once the day begins.
pub fn is_older_than(date: NaiveDate, months: u32, today: NaiveDate) -> bool {
    date.checked_add_months(Months::new(months))
        .is_some_and(|due| due <= today)
}
