//! Root of the `martin-core` library.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output goes through the TUI or the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod book;
pub mod config;
pub mod contact;
pub mod details;
pub mod directory;
pub mod error;
pub mod fields;
pub mod patch;
pub mod people;
pub mod sort;
pub mod status;
pub mod translate;

pub use book::ContactBook;
pub use book::LoadSummary;
pub use config::MartinConfig;
pub use contact::ContactRecord;
pub use contact::EngagementTier;
pub use contact::IdentityHandle;
pub use directory::DirectorySync;
pub use error::MartinErr;
pub use error::RemoteError;
pub use error::SortError;
pub use error::ValidationError;
pub use fields::Field;
pub use patch::PendingPatch;
pub use people::RemotePerson;
pub use sort::SortDirection;
pub use sort::SortState;
pub use status::Status;
pub use translate::DataAnomaly;
