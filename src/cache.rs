//! Freshness-gated persistence of the academics collections.
//!
//! The payload is spread over three keys so it stays readable by anything else
//! sharing the store: the two JSON arrays and the epoch-millis timestamp of the
//! fetch that produced them.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::storage::{CacheCell, Storage};
use crate::types::{AcademicData, Course, Rule};

pub const RULES_KEY: &str = "cachedAcademicRules";
pub const COURSES_KEY: &str = "cachedCourses";
pub const TIMESTAMP_KEY: &str = "academicDataCacheTimestamp";

/// Five minutes.
pub const DEFAULT_TTL_MS: i64 = 300_000;

pub struct AcademicCache {
    store: Arc<dyn Storage>,
    ttl_ms: i64,
}

impl AcademicCache {
    pub fn new(store: Arc<dyn Storage>, ttl_ms: i64) -> Self {
        Self { store, ttl_ms }
    }

    pub fn ttl_ms(&self) -> i64 { self.ttl_ms }

    /// Read all three keys into a cell. Missing keys, an unparsable timestamp or
    /// undecodable JSON all count as "nothing cached".
    pub async fn read(&self) -> Result<Option<CacheCell<AcademicData>>> {
        let rules = self.store.get(RULES_KEY).await?;
        let courses = self.store.get(COURSES_KEY).await?;
        let stamp = self.store.get(TIMESTAMP_KEY).await?;
        let (Some(rules), Some(courses), Some(stamp)) = (rules, courses, stamp) else {
            debug!("academic cache incomplete");
            return Ok(None);
        };

        let Ok(fetched_at) = stamp.trim().parse::<i64>() else {
            warn!(%stamp, "ignoring academic cache with bad timestamp");
            return Ok(None);
        };
        let rules: Vec<Rule> = match serde_json::from_str(&rules) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "ignoring undecodable cached rules");
                return Ok(None);
            }
        };
        let courses: Vec<Course> = match serde_json::from_str(&courses) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "ignoring undecodable cached courses");
                return Ok(None);
            }
        };

        Ok(Some(CacheCell::new(AcademicData { rules, courses }, fetched_at, self.ttl_ms)))
    }

    /// Cached data if it was fetched less than one TTL before `now`.
    pub async fn load_fresh(&self, now: i64) -> Result<Option<AcademicData>> {
        let cell = self.read().await?;
        Ok(match cell {
            Some(cell) if cell.is_expired(now) => {
                debug!(expires_at = cell.expires_at, now, "academic cache stale");
                None
            }
            Some(cell) => cell.into_fresh(now),
            None => None,
        })
    }

    /// Overwrite the cache with `data` fetched at `now`.
    pub async fn write(&self, data: &AcademicData, now: i64) -> Result<()> {
        let entries = [
            (RULES_KEY, serde_json::to_string(&data.rules)?),
            (COURSES_KEY, serde_json::to_string(&data.courses)?),
            (TIMESTAMP_KEY, now.to_string()),
        ];
        self.store.put_all(&entries).await?;
        debug!(rules = data.rules.len(), courses = data.courses.len(), "academic cache written");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        for key in [RULES_KEY, COURSES_KEY, TIMESTAMP_KEY] {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}
