//! Reference catalogs: stages, owners and pipelines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::RecordId;

/// Named step of a sales pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stage {
    #[must_use]
    pub fn new(id: impl Into<RecordId>, name: &str) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.to_string()),
            extra: Map::new(),
        }
    }

    /// Stage name, if present and not blank.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// CRM user owning deals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Owner {
    #[must_use]
    pub fn new(id: impl Into<RecordId>, display_name: &str, email: &str) -> Self {
        Self {
            id: Some(id.into()),
            display_name: Some(display_name.to_string()),
            email: Some(email.to_string()),
            extra: Map::new(),
        }
    }

    /// Display name, then email, then `"Owner {id}"`.
    ///
    /// Returns `None` only when the record carries none of the three.
    pub fn label(&self) -> Option<String> {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .map(str::to_string)
            .or_else(|| self.id.as_ref().map(|id| format!("Owner {id}")))
    }
}

/// Named sales process; deals belong to exactly one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
