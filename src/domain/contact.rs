use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::{RecordId, null_as_default};
use crate::pagination::PageMeta;

/// Contact as returned by the provider's contact views.
///
/// Only the fields used for aggregation are typed; everything else is kept in
/// `extra` and relayed verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Provider-assigned labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    #[must_use]
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// `"first last"` with each part trimmed; empty parts are dropped.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        format!("{first} {last}").trim().to_string()
    }
}

/// One page of `contacts/view/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContactsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<Contact>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PageMeta,
}
