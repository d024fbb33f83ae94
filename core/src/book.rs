//! Application context: the loaded contact collection and its sort state.
//!
//! Every operation that touches the collection goes through
//! [`ContactBook`], so the model can be driven without a terminal.

use chrono::NaiveDate;

use crate::contact::ContactRecord;
use crate::directory::DirectorySync;
use crate::error::MartinErr;
use crate::error::RemoteError;
use crate::error::SortError;
use crate::error::ValidationError;
use crate::fields;
use crate::fields::Field;
use crate::fields::FieldEdit;
use crate::sort::SortState;
use crate::sort::sort_records;
use crate::translate::DataAnomaly;
use crate::translate::LoadReport;
use crate::translate::translate_all;

/// Counts reported after a reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped_unnamed: usize,
    pub anomalies: usize,
}

#[derive(Debug, Default)]
pub struct ContactBook {
    records: Vec<ContactRecord>,
    sort: Option<SortState>,
    anomalies: Vec<DataAnomaly>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ContactRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Anomalies found in the most recent load.
    pub fn anomalies(&self) -> &[DataAnomaly] {
        &self.anomalies
    }

    /// Discard the current collection and adopt `report` wholesale. An
    /// active sort is re-applied to the new collection.
    pub fn replace(&mut self, report: LoadReport) -> LoadSummary {
        let unsent = self
            .records
            .iter()
            .filter(|r| r.has_pending_changes())
            .count();
        if unsent > 0 {
            tracing::warn!(unsent, "reload discards contacts with unsent edits");
        }

        let summary = LoadSummary {
            loaded: report.records.len(),
            skipped_unnamed: report.skipped_unnamed,
            anomalies: report.anomalies.len(),
        };
        self.records = report.records;
        self.anomalies = report.anomalies;
        if let Some(state) = self.sort {
            sort_records(&mut self.records, state.field, state.direction);
        }
        summary
    }

    /// Header activation: toggle or reset the sort and reorder.
    pub fn activate_sort(&mut self, column: usize) -> Result<SortState, SortError> {
        let field = Field::from_index(column).ok_or(SortError::UnknownField(column))?;
        let state = SortState::activate(self.sort, field);
        sort_records(&mut self.records, state.field, state.direction);
        self.sort = Some(state);
        Ok(state)
    }

    /// Validate and apply an edit locally, staging its remote patch.
    pub fn apply_edit(
        &mut self,
        index: usize,
        field_name: &str,
        raw: &str,
    ) -> Result<(), ValidationError> {
        let record = self
            .records
            .get_mut(index)
            .ok_or(ValidationError::NoSuchRecord(index))?;
        fields::update(record, field_name, raw)
    }

    /// Fetch everything from the directory and replace the collection.
    /// On failure the current collection is kept.
    pub async fn reload<D>(&mut self, directory: &D) -> Result<LoadSummary, RemoteError>
    where
        D: DirectorySync + ?Sized,
    {
        let remotes = directory.list_records().await?;
        let summary = self.replace(translate_all(remotes));
        tracing::info!(
            loaded = summary.loaded,
            skipped = summary.skipped_unnamed,
            anomalies = summary.anomalies,
            "contacts loaded"
        );
        Ok(summary)
    }

    /// Send the staged groups of one record. Nothing staged is a no-op.
    /// A failed push keeps the staged groups for the next attempt.
    pub async fn push<D>(&mut self, index: usize, directory: &D) -> Result<(), RemoteError>
    where
        D: DirectorySync + ?Sized,
    {
        let Some(record) = self.records.get_mut(index) else {
            return Ok(());
        };
        if !record.has_pending_changes() {
            return Ok(());
        }
        let mask = record.pending_patch().update_mask();
        match directory
            .patch_record(record.handle(), record.pending_patch())
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    contact = record.display_name(),
                    fields = %mask,
                    "contact updated"
                );
                record.mark_pushed(updated);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    contact = record.display_name(),
                    fields = %mask,
                    "contact update failed: {err}"
                );
                Err(err)
            }
        }
    }

    /// Edit submission from the table: validate, mutate, push.
    pub async fn submit_edit<D>(
        &mut self,
        directory: &D,
        index: usize,
        field_name: &str,
        raw: &str,
    ) -> Result<(), MartinErr>
    where
        D: DirectorySync + ?Sized,
    {
        self.apply_edit(index, field_name, raw)?;
        self.push(index, directory).await?;
        Ok(())
    }

    /// Record that the contact was reached today with a birthday message:
    /// sets the last contact date and note, then pushes once.
    pub async fn acknowledge_birthday<D>(
        &mut self,
        directory: &D,
        index: usize,
        today: NaiveDate,
        note: &str,
    ) -> Result<(), MartinErr>
    where
        D: DirectorySync + ?Sized,
    {
        let record = self
            .records
            .get_mut(index)
            .ok_or(ValidationError::NoSuchRecord(index))?;
        FieldEdit::LastContactDate(today).apply(record);
        FieldEdit::LastContactNote(note.to_string()).apply(record);
        self.push(index, directory).await?;
        Ok(())
    }
}
