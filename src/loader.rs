use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::ContentSource;
use crate::cache::AcademicCache;
use crate::error::ContentError;
use crate::types::{AcademicData, Course, CourseType};

/// Where the loader is in its lifecycle.
///
/// `Loading` only lasts while a fetch is awaited, so it is seen through
/// [`AcademicLoader::subscribe`] rather than [`AcademicLoader::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    /// Message shown to the reader; no automatic retry.
    Failed(String),
}

/// Owns the academics collections and decides between cache and network.
pub struct AcademicLoader {
    source: Arc<dyn ContentSource>,
    cache: AcademicCache,
    status: LoadStatus,
    published: watch::Sender<LoadStatus>,
    data: AcademicData,
}

impl AcademicLoader {
    pub fn new(source: Arc<dyn ContentSource>, cache: AcademicCache) -> Self {
        let (published, _rx) = watch::channel(LoadStatus::Idle);
        Self { source, cache, status: LoadStatus::Idle, published, data: AcademicData::default() }
    }

    pub fn status(&self) -> &LoadStatus { &self.status }
    pub fn data(&self) -> &AcademicData { &self.data }
    pub fn cache(&self) -> &AcademicCache { &self.cache }

    /// Receives every status transition, including `Loading`.
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> { self.published.subscribe() }

    pub fn courses_of<'a>(&'a self, kind: &'a CourseType) -> impl Iterator<Item = &'a Course> + 'a {
        self.data.courses_of(kind)
    }

    /// Initial load: serve a fresh cache, otherwise fetch.
    pub async fn mount(&mut self) -> &LoadStatus {
        self.mount_at(current_epoch_millis()).await
    }

    pub async fn mount_at(&mut self, now: i64) -> &LoadStatus {
        match self.cache.load_fresh(now).await {
            Ok(Some(data)) => {
                info!(rules = data.rules.len(), courses = data.courses.len(), "serving academics from cache");
                self.data = data;
                self.set_status(LoadStatus::Ready);
                return &self.status;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "academic cache unreadable; fetching"),
        }
        self.fetch_at(now).await
    }

    /// Skip the cache and fetch both collections.
    pub async fn refresh(&mut self) -> &LoadStatus {
        self.fetch_at(current_epoch_millis()).await
    }

    pub async fn fetch_at(&mut self, now: i64) -> &LoadStatus {
        self.set_status(LoadStatus::Loading);
        match self.fetch_both().await {
            Ok(data) => {
                if let Err(e) = self.cache.write(&data, now).await {
                    warn!(error = %e, "failed to persist academic cache");
                }
                info!(rules = data.rules.len(), courses = data.courses.len(), "academics fetched");
                self.data = data;
                self.set_status(LoadStatus::Ready);
            }
            Err(e) => {
                warn!(error = %e, resource = e.resource(), fetch = e.is_fetch(), "loading academics failed");
                self.set_status(LoadStatus::Failed(e.to_string()));
            }
        }
        &self.status
    }

    fn set_status(&mut self, status: LoadStatus) {
        self.published.send_replace(status.clone());
        self.status = status;
    }

    // Rules first; courses are only requested once rules have arrived.
    async fn fetch_both(&self) -> Result<AcademicData, ContentError> {
        let rules = self.source.fetch_rules().await?;
        let courses = self.source.fetch_courses().await?;
        Ok(AcademicData { rules, courses })
    }
}

pub fn current_epoch_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::api::{COURSES_RESOURCE, RULES_RESOURCE};
    use crate::cache::{DEFAULT_TTL_MS, TIMESTAMP_KEY};
    use crate::storage::{MemoryStore, Storage};
    use crate::types::{RichBlock, Rule};

    #[derive(Default)]
    struct FakeSource {
        rules_calls: AtomicUsize,
        courses_calls: AtomicUsize,
        fail_courses: bool,
        fail_rules: bool,
        order: Mutex<Vec<&'static str>>,
        // Holds the rules request open until notified
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_rules(&self) -> Result<Vec<Rule>, ContentError> {
            self.rules_calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push("rules");
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_rules {
                return Err(ContentError::Status { resource: RULES_RESOURCE, status: 500 });
            }
            Ok(vec![Rule { id: 1, title: "Attendance".into(), description: vec![RichBlock::paragraph("80% minimum")], grading: None }])
        }

        async fn fetch_courses(&self) -> Result<Vec<Course>, ContentError> {
            self.courses_calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push("courses");
            if self.fail_courses {
                return Err(ContentError::Status { resource: COURSES_RESOURCE, status: 404 });
            }
            Ok(vec![
                Course { id: 1, coursetype: CourseType::Core, about: vec![RichBlock::heading("CS301 Algorithms")] },
                Course { id: 2, coursetype: CourseType::Elective, about: vec![RichBlock::heading("CS401 Compilers")] },
            ])
        }
    }

    fn loader(source: Arc<FakeSource>, store: Arc<MemoryStore>) -> AcademicLoader {
        AcademicLoader::new(source, AcademicCache::new(store, DEFAULT_TTL_MS))
    }

    fn calls(source: &FakeSource) -> usize {
        source.rules_calls.load(Ordering::SeqCst) + source.courses_calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn fetches_sequentially_and_caches() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(MemoryStore::new());
        let mut l = loader(source.clone(), store.clone());
        assert_eq!(l.status(), &LoadStatus::Idle);

        assert_eq!(l.mount_at(1_000).await, &LoadStatus::Ready);
        assert_eq!(*source.order.lock().unwrap(), vec!["rules", "courses"]);
        assert_eq!(l.data().rules.len(), 1);
        assert_eq!(l.courses_of(&CourseType::Elective).count(), 1);
        assert_eq!(store.get(TIMESTAMP_KEY).await.unwrap().as_deref(), Some("1000"));
    }

    #[tokio::test]
    async fn fresh_cache_skips_network() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(MemoryStore::new());
        loader(source.clone(), store.clone()).mount_at(0).await;
        assert_eq!(calls(&source), 2);

        let mut second = loader(source.clone(), store.clone());
        assert_eq!(second.mount_at(299_999).await, &LoadStatus::Ready);
        assert_eq!(calls(&source), 2);
        assert_eq!(second.data().courses.len(), 2);
    }

    #[tokio::test]
    async fn stale_cache_refetches() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(MemoryStore::new());
        loader(source.clone(), store.clone()).mount_at(0).await;

        let mut later = loader(source.clone(), store.clone());
        later.mount_at(300_001).await;
        assert_eq!(calls(&source), 4);
        assert_eq!(store.get(TIMESTAMP_KEY).await.unwrap().as_deref(), Some("300001"));
    }

    #[tokio::test]
    async fn second_endpoint_failure_leaves_cache_alone() {
        let source = Arc::new(FakeSource { fail_courses: true, ..Default::default() });
        let store = Arc::new(MemoryStore::new());
        let mut l = loader(source.clone(), store.clone());

        let status = l.mount_at(5).await.clone();
        assert_eq!(status, LoadStatus::Failed("Failed to fetch courses (HTTP 404)".into()));
        assert_eq!(source.rules_calls.load(Ordering::SeqCst), 1);
        assert!(l.data().rules.is_empty());
        assert_eq!(store.get(TIMESTAMP_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn first_endpoint_failure_skips_second() {
        let source = Arc::new(FakeSource { fail_rules: true, ..Default::default() });
        let mut l = loader(source.clone(), Arc::new(MemoryStore::new()));
        assert!(matches!(l.mount_at(5).await, LoadStatus::Failed(m) if m.contains("academic rules")));
        assert_eq!(source.courses_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_data() {
        let store = Arc::new(MemoryStore::new());
        let mut l = loader(Arc::new(FakeSource::default()), store.clone());
        l.mount_at(0).await;
        let before = l.data().clone();

        let failing: Arc<dyn ContentSource> = Arc::new(FakeSource { fail_courses: true, ..Default::default() });
        l.source = failing;
        assert!(matches!(l.fetch_at(10).await, LoadStatus::Failed(_)));
        assert_eq!(l.data(), &before);
        assert_eq!(store.get(TIMESTAMP_KEY).await.unwrap().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn loading_is_published_while_fetching() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource { gate: Some(gate.clone()), ..Default::default() });
        let mut l = loader(source, Arc::new(MemoryStore::new()));
        let mut rx = l.subscribe();
        assert_eq!(*rx.borrow_and_update(), LoadStatus::Idle);

        let task = tokio::spawn(async move { l.mount_at(0).await.clone() });
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), LoadStatus::Loading);

        gate.notify_one();
        assert_eq!(task.await.unwrap(), LoadStatus::Ready);
        assert_eq!(*rx.borrow(), LoadStatus::Ready);
    }
}
