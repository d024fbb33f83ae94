//! Raw view of a contact for the details pane.

use crate::contact::ContactRecord;

/// The remote snapshot behind `record`, as indented JSON.
pub fn details_text(record: &ContactRecord) -> String {
    match serde_json::to_string_pretty(record.remote_snapshot()) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(contact = record.display_name(), "cannot render details: {err}");
            format!("{:#?}", record.remote_snapshot())
        }
    }
}
