use martin_core::Field;

/// Work requested by a key press that needs the contact book, the
/// directory or the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Quit,
    Reload,
    Sort {
        column: usize,
    },
    ShowDetails {
        record: usize,
    },
    OpenUrl(String),
    SubmitEdit {
        record: usize,
        field: Field,
        value: String,
    },
    /// Last contact was a birthday message, sent today.
    AcknowledgeBirthday {
        record: usize,
    },
}
