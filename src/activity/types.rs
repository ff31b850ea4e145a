//! Activity record and query types.
//!
//! Records serialize with camelCase field names so stored payloads match the
//! wire shape produced by existing clients. `activity_details` is free-form
//! JSON; its string leaves are what the cipher encrypts at rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an agent did to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    View,
    Call,
    Email,
    Whatsapp,
    Edit,
    StatusChange,
    Delete,
    ScheduleCall,
    BulkAction,
}

/// One activity event as logged against an admin's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub agent_id: String,
    pub lead_id: String,
    pub activity_type: ActivityType,
    /// Free-form detail payload. String leaves are encrypted at rest.
    pub activity_details: Value,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ActivityRecord {
    /// Build a record stamped with the current time and no metadata.
    pub fn now(
        agent_id: impl Into<String>,
        lead_id: impl Into<String>,
        activity_type: ActivityType,
        activity_details: Value,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            lead_id: lead_id.into(),
            activity_type,
            activity_details,
            timestamp: Utc::now(),
            metadata: None,
        }
    }
}

/// A decrypted record together with its store-assigned entry id.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedActivity {
    pub id: String,
    pub record: ActivityRecord,
}

/// Fetch-side filters. All fields optional; `limit` defaults to
/// [`crate::types::DEFAULT_QUERY_LIMIT`] when unset.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub agent_id: Option<String>,
    pub lead_id: Option<String>,
    pub limit: Option<usize>,
}

impl ActivityQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_agent(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            ..Self::default()
        }
    }

    pub fn for_lead(lead_id: impl Into<String>) -> Self {
        Self {
            lead_id: Some(lead_id.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
