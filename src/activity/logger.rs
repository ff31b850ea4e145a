//! Encrypted activity logging over an injected storage backend.
//!
//! The write path is deliberately lossy: logging is an auxiliary concern, so
//! any failure (key unavailable, encryption error, backend write error) is
//! logged at warn level and swallowed. The caller's operation proceeds. The
//! read path is strict about storage and key errors but tolerant of
//! individual undecodable entries, which are skipped with a warning.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::keys::KeyProvider;
use crate::storage::StorageBackend;
use crate::types::DEFAULT_QUERY_LIMIT;

use super::types::{ActivityQuery, ActivityRecord, LoggedActivity};

pub struct ActivityLogger {
    backend: Arc<dyn StorageBackend>,
    keys: KeyProvider,
}

impl ActivityLogger {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let keys = KeyProvider::new(Arc::clone(&backend));
        Self { backend, keys }
    }

    /// Use a provider configured with a non-default key slot.
    pub fn with_provider(backend: Arc<dyn StorageBackend>, keys: KeyProvider) -> Self {
        Self { backend, keys }
    }

    /// Encrypt and append one activity record to the admin's collection.
    ///
    /// Never returns an error: on any failure the record is dropped, a
    /// warning is emitted, and `Ok(None)` is returned. On success the
    /// store-assigned entry id comes back.
    pub async fn log(&self, admin_id: &str, record: &ActivityRecord) -> Result<Option<String>> {
        match self.try_log(admin_id, record).await {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                warn!(admin_id, error = %err, "activity not logged");
                Ok(None)
            }
        }
    }

    async fn try_log(&self, admin_id: &str, record: &ActivityRecord) -> Result<String> {
        let cipher = self.keys.obtain().await?;

        // Details that arrive already encrypted (read straight off storage
        // by a client) get decrypted first so a re-log stores one layer of
        // ciphertext. Plaintext details pass through unchanged.
        let details = cipher.decrypt_value(&record.activity_details);
        let mut normalized = record.clone();
        normalized.activity_details = details;

        let plain: Value = serde_json::to_value(&normalized)?;
        let encrypted = cipher.encrypt_value(&plain)?;
        self.backend.append_activity(admin_id, &encrypted).await
    }

    /// Fetch, decrypt, and filter the admin's activity collection.
    ///
    /// Results come back newest first. `query.agent_id` and `query.lead_id`
    /// narrow by exact match; `query.limit` caps the result count after
    /// sorting, defaulting to [`DEFAULT_QUERY_LIMIT`]. Entries that fail to
    /// deserialize are skipped with a warning rather than failing the fetch.
    pub async fn fetch(
        &self,
        admin_id: &str,
        query: &ActivityQuery,
    ) -> Result<Vec<LoggedActivity>> {
        let cipher = self.keys.obtain().await?;
        let entries = self.backend.fetch_activities(admin_id).await?;

        let mut activities = Vec::with_capacity(entries.len());
        for entry in entries {
            let decrypted = cipher.decrypt_value(&entry.payload);
            match serde_json::from_value::<ActivityRecord>(decrypted) {
                Ok(record) => activities.push(LoggedActivity {
                    id: entry.id,
                    record,
                }),
                Err(err) => {
                    warn!(admin_id, entry_id = %entry.id, error = %err, "skipping undecodable activity entry");
                }
            }
        }

        activities.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));

        if let Some(agent_id) = &query.agent_id {
            activities.retain(|a| &a.record.agent_id == agent_id);
        }
        if let Some(lead_id) = &query.lead_id {
            activities.retain(|a| &a.record.lead_id == lead_id);
        }

        activities.truncate(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT));
        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityType;
    use crate::storage::MemoryBackend;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn setup() -> (Arc<MemoryBackend>, ActivityLogger) {
        let backend = Arc::new(MemoryBackend::new());
        let logger = ActivityLogger::new(Arc::clone(&backend) as Arc<dyn StorageBackend>);
        (backend, logger)
    }

    fn record_at(
        agent: &str,
        lead: &str,
        minutes_ago: i64,
        details: serde_json::Value,
    ) -> ActivityRecord {
        let mut record = ActivityRecord::now(agent, lead, ActivityType::Call, details);
        record.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        record
    }

    #[tokio::test]
    async fn log_and_fetch_round_trip() {
        let (_, logger) = setup();
        let record = record_at("agent1", "lead1", 0, json!({"note": "Discussed pricing"}));

        let id = logger.log("admin1", &record).await.unwrap();
        assert!(id.is_some());

        let fetched = logger.fetch("admin1", &ActivityQuery::all()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, id.unwrap());
        assert_eq!(fetched[0].record, record);
    }

    #[tokio::test]
    async fn stored_payload_is_encrypted() {
        let (backend, logger) = setup();
        let record = record_at("agent1", "lead1", 0, json!({"note": "Discussed pricing"}));
        logger.log("admin1", &record).await.unwrap();

        let raw = backend.fetch_activities("admin1").await.unwrap();
        let stored = serde_json::to_string(&raw[0].payload).unwrap();
        assert!(!stored.contains("Discussed pricing"));
        assert!(!stored.contains("agent1"));
    }

    #[tokio::test]
    async fn fetch_is_newest_first() {
        let (_, logger) = setup();
        logger
            .log("a", &record_at("g", "l", 30, json!({"n": "oldest"})))
            .await
            .unwrap();
        logger
            .log("a", &record_at("g", "l", 10, json!({"n": "middle"})))
            .await
            .unwrap();
        logger
            .log("a", &record_at("g", "l", 20, json!({"n": "older"})))
            .await
            .unwrap();

        let fetched = logger.fetch("a", &ActivityQuery::all()).await.unwrap();
        let notes: Vec<&str> = fetched
            .iter()
            .map(|a| a.record.activity_details["n"].as_str().unwrap())
            .collect();
        assert_eq!(notes, vec!["middle", "older", "oldest"]);
    }

    #[tokio::test]
    async fn agent_and_lead_filters() {
        let (_, logger) = setup();
        logger
            .log("a", &record_at("agent1", "lead1", 1, json!(1)))
            .await
            .unwrap();
        logger
            .log("a", &record_at("agent1", "lead2", 2, json!(2)))
            .await
            .unwrap();
        logger
            .log("a", &record_at("agent2", "lead1", 3, json!(3)))
            .await
            .unwrap();

        let by_agent = logger
            .fetch("a", &ActivityQuery::for_agent("agent1"))
            .await
            .unwrap();
        assert_eq!(by_agent.len(), 2);
        assert!(by_agent.iter().all(|r| r.record.agent_id == "agent1"));

        let by_lead = logger
            .fetch("a", &ActivityQuery::for_lead("lead1"))
            .await
            .unwrap();
        assert_eq!(by_lead.len(), 2);
        assert!(by_lead.iter().all(|r| r.record.lead_id == "lead1"));

        let both = ActivityQuery {
            agent_id: Some("agent1".into()),
            lead_id: Some("lead1".into()),
            limit: None,
        };
        assert_eq!(logger.fetch("a", &both).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn limit_applies_after_sort() {
        let (_, logger) = setup();
        for n in 0..5 {
            logger
                .log("a", &record_at("g", "l", n, json!({"n": n})))
                .await
                .unwrap();
        }

        let fetched = logger
            .fetch("a", &ActivityQuery::all().with_limit(2))
            .await
            .unwrap();
        assert_eq!(fetched.len(), 2);
        // Newest two survive the cut
        assert_eq!(fetched[0].record.activity_details["n"], json!(0));
        assert_eq!(fetched[1].record.activity_details["n"], json!(1));
    }

    #[tokio::test]
    async fn default_limit_is_fifty() {
        let (_, logger) = setup();
        for n in 0..60 {
            logger
                .log("a", &record_at("g", "l", n, json!({"n": n})))
                .await
                .unwrap();
        }
        let fetched = logger.fetch("a", &ActivityQuery::all()).await.unwrap();
        assert_eq!(fetched.len(), DEFAULT_QUERY_LIMIT);
    }

    #[tokio::test]
    async fn relogging_fetched_details_does_not_double_encrypt() {
        let (_, logger) = setup();
        logger
            .log("a", &record_at("g", "l", 0, json!({"note": "call back Monday"})))
            .await
            .unwrap();

        // Fetch raw (still-encrypted details would require the raw payload;
        // simulate a client re-logging details it read straight off storage)
        let cipher = logger.keys.obtain().await.unwrap();
        let encrypted_details = cipher
            .encrypt_value(&json!({"note": "call back Monday"}))
            .unwrap();
        let record = record_at("g", "l", 0, encrypted_details);
        logger.log("a", &record).await.unwrap();

        let fetched = logger.fetch("a", &ActivityQuery::all()).await.unwrap();
        for activity in fetched {
            assert_eq!(
                activity.record.activity_details,
                json!({"note": "call back Monday"})
            );
        }
    }

    #[tokio::test]
    async fn fetch_skips_undecodable_entries() {
        let (backend, logger) = setup();
        logger
            .log("a", &record_at("g", "l", 0, json!({"n": 1})))
            .await
            .unwrap();
        // A foreign writer appended junk to the same collection
        backend
            .append_activity("a", &json!({"not": "an activity record"}))
            .await
            .unwrap();

        let fetched = logger.fetch("a", &ActivityQuery::all()).await.unwrap();
        assert_eq!(fetched.len(), 1);
    }

    #[tokio::test]
    async fn unknown_admin_fetches_empty() {
        let (_, logger) = setup();
        assert!(logger
            .fetch("nobody", &ActivityQuery::all())
            .await
            .unwrap()
            .is_empty());
    }
}
