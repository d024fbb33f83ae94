use std::sync::Mutex;

use async_trait::async_trait;
use martin_core::DirectorySync;
use martin_core::IdentityHandle;
use martin_core::PendingPatch;
use martin_core::RemoteError;
use martin_core::RemotePerson;
use serde_json::Value;

/// In-memory directory that applies patches the way the People API does:
/// every staged group replaces the stored group wholesale.
#[derive(Default)]
pub struct MemoryDirectory {
    pub people: Mutex<Vec<RemotePerson>>,
    pub masks: Mutex<Vec<String>>,
    pub fail_next_patch: Mutex<bool>,
}

impl MemoryDirectory {
    pub fn with_people(people: Vec<Value>) -> Self {
        let people = people
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect();
        Self {
            people: Mutex::new(people),
            ..Default::default()
        }
    }

    pub fn stored(&self, resource_name: &str) -> RemotePerson {
        self.people
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.resource_name == resource_name)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl DirectorySync for MemoryDirectory {
    async fn list_records(&self) -> Result<Vec<RemotePerson>, RemoteError> {
        Ok(self.people.lock().unwrap().clone())
    }

    async fn patch_record(
        &self,
        handle: &IdentityHandle,
        patch: &PendingPatch,
    ) -> Result<RemotePerson, RemoteError> {
        {
            let mut fail = self.fail_next_patch.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(RemoteError::transport("connection reset"));
            }
        }

        let body = serde_json::to_value(patch.body(handle.etag())).unwrap();
        let mut people = self.people.lock().unwrap();
        let person = people
            .iter_mut()
            .find(|p| p.resource_name == handle.resource_name())
            .ok_or(RemoteError::Http {
                status: 404,
                message: "Requested entity was not found.".to_string(),
            })?;

        let mut stored = serde_json::to_value(&*person).unwrap();
        if let (Some(stored), Some(body)) = (stored.as_object_mut(), body.as_object()) {
            for (key, value) in body {
                if key != "etag" {
                    stored.insert(key.clone(), value.clone());
                }
            }
        }
        let mut updated: RemotePerson = serde_json::from_value(stored).unwrap();
        let generation = self.masks.lock().unwrap().len() + 1;
        updated.etag = Some(format!("etag-{generation}"));
        *person = updated.clone();

        self.masks.lock().unwrap().push(patch.update_mask());
        Ok(updated)
    }
}
