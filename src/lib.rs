pub mod api;
pub mod cache;
pub mod carousel;
pub mod config;
pub mod courses;
pub mod db;
pub mod error;
pub mod loader;
pub mod page;
pub mod render;
pub mod rules;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::carousel::{Carousel, SlideView, Swipe};
    pub use crate::config::PortalConfig;
    pub use crate::courses::{derive_courses, CourseRecord};
    pub use crate::error::{CarouselError, ContentError};
    pub use crate::loader::{AcademicLoader, LoadStatus};
    pub use crate::rules::{parse_grading_table, render_description, GradingTable, RenderNode};
    pub use crate::types::{AcademicData, Course, CourseType, RichBlock, Rule};
    pub use crate::Portal;
}

use std::sync::Arc;

use anyhow::Result;

use crate::api::HttpSource;
use crate::cache::AcademicCache;
use crate::carousel::Carousel;
use crate::config::PortalConfig;
use crate::db::Database;
use crate::error::CarouselError;
use crate::loader::{AcademicLoader, LoadStatus};
use crate::storage::{MemoryStore, Storage};

/// Library entry point. Owns the cache store and the academics loader.
pub struct Portal {
    config: PortalConfig,
    loader: AcademicLoader,
}

impl Portal {
    /// Open the SQLite cache (running migrations) and build the CMS client.
    pub async fn connect(config: PortalConfig) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await?;
        db.run_migrations().await?;
        Self::with_store(config, Arc::new(db))
    }

    /// Like `connect`, but nothing outlives the process.
    pub fn ephemeral(config: PortalConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: PortalConfig, store: Arc<dyn Storage>) -> Result<Self> {
        let source = HttpSource::new(&config.base_url, config.http_timeout())?;
        let cache = AcademicCache::new(store, config.cache_ttl_ms);
        let loader = AcademicLoader::new(Arc::new(source), cache);
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &PortalConfig { &self.config }
    pub fn loader(&self) -> &AcademicLoader { &self.loader }

    /// Load academics, from cache when fresh unless `refresh` is set.
    pub async fn load_academics(&mut self, refresh: bool) -> &LoadStatus {
        if refresh { self.loader.refresh().await } else { self.loader.mount().await }
    }

    /// Render the whole Academics page for the current state.
    pub fn render_page(&self) -> String {
        render::render_page(self.loader.status(), self.loader.data())
    }

    pub fn render_section(&self, section: page::Section) -> String {
        render::render_section(self.loader.status(), self.loader.data(), section)
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.loader.cache().clear().await
    }

    /// Carousel using the configured timing.
    pub fn carousel(&self, slides: Vec<String>) -> Result<Carousel, CarouselError> {
        Carousel::with_timing(slides, self.config.carousel_interval(), self.config.carousel.swipe_threshold_px)
    }
}
