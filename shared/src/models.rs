use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who declared a sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidecarOrigin {
    /// Created through the API by a user
    User,
    /// Declared by a buildpack
    System,
}

impl std::fmt::Display for SidecarOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SidecarOrigin::User => write!(f, "user"),
            SidecarOrigin::System => write!(f, "system"),
        }
    }
}

/// A process that runs alongside an app's processes in the same container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sidecar {
    pub guid: Uuid,
    pub app_guid: String,
    pub name: String,
    pub command: String,
    pub process_types: Vec<String>,
    pub memory_in_mb: Option<u64>,
    pub origin: SidecarOrigin,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipData {
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToOneRelationship {
    pub data: RelationshipData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarRelationships {
    pub app: ToOneRelationship,
}

/// Public rendering of a sidecar resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarResponse {
    pub guid: Uuid,
    pub name: String,
    pub command: String,
    pub process_types: Vec<String>,
    pub memory_in_mb: Option<u64>,
    pub origin: SidecarOrigin,
    pub relationships: SidecarRelationships,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<&Sidecar> for SidecarResponse {
    fn from(sidecar: &Sidecar) -> Self {
        Self {
            guid: sidecar.guid,
            name: sidecar.name.clone(),
            command: sidecar.command.clone(),
            process_types: sidecar.process_types.clone(),
            memory_in_mb: sidecar.memory_in_mb,
            origin: sidecar.origin,
            relationships: SidecarRelationships {
                app: ToOneRelationship {
                    data: RelationshipData {
                        guid: sidecar.app_guid.clone(),
                    },
                },
            },
            created_at: sidecar
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: sidecar
                .updated_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Collection wrapper used by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceList<T> {
    pub resources: Vec<T>,
}
