//! Column sorting.
//!
//! [`sort_records`] is a pure, stable function of (records, field,
//! direction). The toggling behaviour of clicking a header lives in
//! [`SortState`], which the caller owns.

use std::cmp::Ordering;

use crate::contact::ContactRecord;
use crate::fields::Field;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }
}

/// Which column the table is currently ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortState {
    /// Next state after activating `field`'s header: the same column
    /// reverses, a different column starts ascending.
    pub fn activate(current: Option<SortState>, field: Field) -> SortState {
        match current {
            Some(state) if state.field == field => SortState {
                field,
                direction: state.direction.reversed(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Compare two records on one column, ascending.
pub fn compare(field: Field, a: &ContactRecord, b: &ContactRecord) -> Ordering {
    match field {
        Field::Tier => a.tier().code().cmp(&b.tier().code()),
        Field::Name => a.display_name().cmp(b.display_name()),
        Field::Relationship => a.relationship_label().cmp(b.relationship_label()),
        Field::LastContactNote => a.last_contact_note().cmp(b.last_contact_note()),
        Field::ProfileUrl => a.profile_url().cmp(b.profile_url()),
        // Dates compare as their canonical text.
        Field::Birthday | Field::LastContactDate => field.text(a).cmp(&field.text(b)),
    }
}

pub fn sort_records(records: &mut [ContactRecord], field: Field, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare(field, a, b);
        if direction.is_ascending() {
            ord
        } else {
            ord.reverse()
        }
    });
}
