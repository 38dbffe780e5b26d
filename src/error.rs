//! Domain error types.
//!
//! Plumbing (config, database, CLI) stays on `anyhow`; the variants here are the
//! failures callers are expected to tell apart.

/// Failure while loading a CMS collection.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The endpoint answered with a non-success status
    #[error("Failed to fetch {resource} (HTTP {status})")]
    Status { resource: &'static str, status: u16 },

    /// The request never produced a response
    #[error("Failed to fetch {resource}: {source}")]
    Network {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the expected `{ "data": [...] }` document
    #[error("Malformed {resource} response: {source}")]
    Parse {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    /// Name of the collection that failed.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Status { resource, .. } | Self::Network { resource, .. } | Self::Parse { resource, .. } => *resource,
        }
    }

    /// True for HTTP and transport failures, false for decode failures.
    pub fn is_fetch(&self) -> bool {
        !matches!(self, Self::Parse { .. })
    }
}

/// Misuse of the carousel controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    #[error("carousel needs at least one slide")]
    NoSlides,

    #[error("slide {index} out of range for {len} slides")]
    OutOfRange { index: usize, len: usize },

    /// Zero interval, or a swipe threshold that is negative or not finite
    #[error("invalid carousel timing: {0}")]
    InvalidTiming(&'static str),
}
