//! In-memory sidecar storage

use std::collections::HashMap;

use cc_shared::{Sidecar, SidecarOrigin};
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::metrics;
use crate::validation::{SidecarCreateMessage, SidecarUpdateMessage};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("sidecar {0} not found")]
    NotFound(Uuid),
    #[error("sidecar name '{name}' is already taken")]
    NameTaken { name: String },
}

/// Sidecars keyed by guid; names are unique per app
#[derive(Debug, Default)]
pub struct SidecarStore {
    sidecars: RwLock<HashMap<Uuid, Sidecar>>,
}

impl SidecarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        &self,
        app_guid: &str,
        message: SidecarCreateMessage,
    ) -> Result<Sidecar, StoreError> {
        let mut sidecars = self.sidecars.write().await;
        ensure_name_available(&sidecars, app_guid, &message.name, None)?;

        let sidecar = Sidecar {
            guid: Uuid::new_v4(),
            app_guid: app_guid.to_string(),
            name: message.name,
            command: message.command,
            process_types: message.process_types,
            memory_in_mb: message.memory_in_mb,
            origin: SidecarOrigin::User,
            created_at: Utc::now(),
            updated_at: None,
        };
        sidecars.insert(sidecar.guid, sidecar.clone());
        metrics::SIDECARS_TOTAL.set(sidecars.len() as i64);

        tracing::debug!(guid = %sidecar.guid, app_guid, "sidecar created");
        Ok(sidecar)
    }

    pub async fn get(&self, guid: Uuid) -> Result<Sidecar, StoreError> {
        self.sidecars
            .read()
            .await
            .get(&guid)
            .cloned()
            .ok_or(StoreError::NotFound(guid))
    }

    /// Sidecars of one app, oldest first
    pub async fn list_for_app(&self, app_guid: &str) -> Vec<Sidecar> {
        let mut found: Vec<Sidecar> = self
            .sidecars
            .read()
            .await
            .values()
            .filter(|s| s.app_guid == app_guid)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        found
    }

    /// Apply the requested fields of `message`; others stay as they are
    pub async fn update(
        &self,
        guid: Uuid,
        message: SidecarUpdateMessage,
    ) -> Result<Sidecar, StoreError> {
        let mut sidecars = self.sidecars.write().await;
        let app_guid = match sidecars.get(&guid) {
            Some(existing) => existing.app_guid.clone(),
            None => return Err(StoreError::NotFound(guid)),
        };
        if let Some(name) = &message.name {
            ensure_name_available(&sidecars, &app_guid, name, Some(guid))?;
        }

        let sidecar = sidecars
            .get_mut(&guid)
            .ok_or(StoreError::NotFound(guid))?;
        if let Some(name) = message.name {
            sidecar.name = name;
        }
        if let Some(command) = message.command {
            sidecar.command = command;
        }
        if let Some(process_types) = message.process_types {
            sidecar.process_types = process_types;
        }
        sidecar.updated_at = Some(Utc::now());

        tracing::debug!(%guid, "sidecar updated");
        Ok(sidecar.clone())
    }

    pub async fn delete(&self, guid: Uuid) -> Result<(), StoreError> {
        let mut sidecars = self.sidecars.write().await;
        sidecars.remove(&guid).ok_or(StoreError::NotFound(guid))?;
        metrics::SIDECARS_TOTAL.set(sidecars.len() as i64);
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.sidecars.read().await.len()
    }
}

fn ensure_name_available(
    sidecars: &HashMap<Uuid, Sidecar>,
    app_guid: &str,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), StoreError> {
    let taken = sidecars
        .values()
        .any(|s| s.app_guid == app_guid && s.name == name && Some(s.guid) != except);
    if taken {
        return Err(StoreError::NameTaken {
            name: name.to_string(),
        });
    }
    Ok(())
}
