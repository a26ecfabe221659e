//! Payload types for the bundled `core/v1` schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::temporal::LocalDateTime;

/// `data` of events that concern a single inventory host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    pub system: RhelSystem,
}

/// A RHEL host as tracked by the console inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhelSystem {
    pub inventory_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Last check-in, reported in the host's wall-clock time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<LocalDateTime>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub groups: Vec<String>,

    /// Members not modelled above, kept for re-serialization.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An inventory tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub namespace: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
