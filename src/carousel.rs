//! Slide carousel controller.
//!
//! The current index lives in a `watch` cell: user actions, touch gestures and
//! the auto-advance task all write to it, and renderers subscribe to it. The
//! auto-advance task also watches the cell so that any index change restarts
//! its countdown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::CarouselError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// What a horizontal drag amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: show the next slide
    Next,
    /// Finger moved right: show the previous slide
    Prev,
    None,
}

impl Swipe {
    /// `delta` is start x minus end x. Deltas exactly at the threshold do nothing.
    pub fn classify(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Swipe::Next
        } else if delta < -threshold {
            Swipe::Prev
        } else {
            Swipe::None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Touch {
    start_x: f64,
    end_x: f64,
}

/// One slide as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideView {
    pub src: String,
    pub alt: String,
    pub active: bool,
}

pub struct Carousel {
    slides: Arc<[String]>,
    index: Arc<watch::Sender<usize>>,
    touch: Mutex<Touch>,
    interval: Duration,
    swipe_threshold: f64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Carousel {
    pub fn new(slides: Vec<String>) -> Result<Self, CarouselError> {
        Self::with_timing(slides, DEFAULT_INTERVAL, DEFAULT_SWIPE_THRESHOLD)
    }

    pub fn with_timing(slides: Vec<String>, interval: Duration, swipe_threshold: f64) -> Result<Self, CarouselError> {
        if slides.is_empty() {
            return Err(CarouselError::NoSlides);
        }
        if interval.is_zero() {
            return Err(CarouselError::InvalidTiming("auto-advance interval must be non-zero"));
        }
        if !swipe_threshold.is_finite() || swipe_threshold < 0.0 {
            return Err(CarouselError::InvalidTiming("swipe threshold must be a finite, non-negative distance"));
        }
        let (tx, _rx) = watch::channel(0);
        Ok(Self {
            slides: slides.into(),
            index: Arc::new(tx),
            touch: Mutex::new(Touch::default()),
            interval,
            swipe_threshold,
            timer: Mutex::new(None),
        })
    }

    pub fn len(&self) -> usize { self.slides.len() }
    pub fn is_empty(&self) -> bool { self.slides.is_empty() }
    pub fn current(&self) -> usize { *self.index.borrow() }

    /// Receives every index change.
    pub fn subscribe(&self) -> watch::Receiver<usize> { self.index.subscribe() }

    pub fn go_to_slide(&self, index: usize) -> Result<(), CarouselError> {
        let len = self.len();
        if index >= len {
            return Err(CarouselError::OutOfRange { index, len });
        }
        self.index.send_if_modified(|i| {
            let changed = *i != index;
            *i = index;
            changed
        });
        Ok(())
    }

    pub fn go_to_next(&self) {
        advance(&self.index, self.len());
    }

    pub fn go_to_prev(&self) {
        let len = self.len();
        self.index.send_if_modified(|i| {
            let prev = (*i + len - 1) % len;
            let changed = prev != *i;
            *i = prev;
            changed
        });
    }

    /// Begin a gesture at `x`. The end point is reset too, so a tap with no
    /// `touch_move` is a zero-length drag and never repeats the previous swipe.
    pub fn touch_start(&self, x: f64) {
        let mut touch = self.touch.lock().unwrap_or_else(|e| e.into_inner());
        *touch = Touch { start_x: x, end_x: x };
    }

    pub fn touch_move(&self, x: f64) {
        self.touch.lock().unwrap_or_else(|e| e.into_inner()).end_x = x;
    }

    /// Finish a gesture, moving at most one slide.
    pub fn touch_end(&self) -> Swipe {
        let touch = *self.touch.lock().unwrap_or_else(|e| e.into_inner());
        let swipe = Swipe::classify(touch.start_x - touch.end_x, self.swipe_threshold);
        match swipe {
            Swipe::Next => self.go_to_next(),
            Swipe::Prev => self.go_to_prev(),
            Swipe::None => {}
        }
        trace!(?swipe, start = touch.start_x, end = touch.end_x, "touch end");
        swipe
    }

    /// Arm auto-advance. Must be called within a tokio runtime; a running timer
    /// is left as is.
    pub fn start(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if timer.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        let index = self.index.clone();
        let mut changes = index.subscribe();
        let len = self.len();
        let interval = self.interval;
        *timer = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        advance(&index, len);
                        changes.borrow_and_update();
                    }
                    changed = changes.changed() => {
                        if changed.is_err() { break; }
                    }
                }
            }
        }));
        debug!(slides = len, interval_ms = interval.as_millis() as u64, "carousel auto-advance started");
    }

    /// Cancel auto-advance. Safe to call any number of times.
    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
            debug!("carousel auto-advance stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn slides(&self) -> Vec<SlideView> {
        let current = self.current();
        self.slides
            .iter()
            .enumerate()
            .map(|(i, src)| SlideView { src: src.clone(), alt: format!("Slide {}", i + 1), active: i == current })
            .collect()
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.stop();
    }
}

fn advance(index: &watch::Sender<usize>, len: usize) {
    index.send_if_modified(|i| {
        let next = (*i + 1) % len;
        let changed = next != *i;
        *i = next;
        changed
    });
}
