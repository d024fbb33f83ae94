//! Contract with the remote directory service.

use async_trait::async_trait;

use crate::contact::IdentityHandle;
use crate::error::RemoteError;
use crate::patch::PendingPatch;
use crate::people::RemotePerson;

/// The system of record for contacts.
///
/// Implementations make one blocking round trip per call from the caller's
/// point of view; there is no retry and no timeout policy here.
#[async_trait]
pub trait DirectorySync: Send + Sync {
    /// Every person in the address book with the field groups in
    /// [`crate::people::PERSON_FIELDS`]. Order is unspecified.
    async fn list_records(&self) -> Result<Vec<RemotePerson>, RemoteError>;

    /// Send exactly the groups staged in `patch` for the record behind
    /// `handle`. Returns the record as the directory now holds it.
    async fn patch_record(
        &self,
        handle: &IdentityHandle,
        patch: &PendingPatch,
    ) -> Result<RemotePerson, RemoteError>;
}
