//! Template storage shared between the loader and concurrent matchers.
//!
//! The store is single-writer / many-reader. The loader only ever appends,
//! publishing a fresh list per template through an [`ArcSwap`], so a reader
//! sees either the whole template or none of it and never takes a lock.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::geometry::Point;
use crate::normalizer::Normalizer;

/// One item of the template feed: a label and the raw, device-space points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub label: String,
    pub points: Vec<Point>,
}

impl TemplateEntry {
    pub fn new<S: Into<String>>(label: S, points: Vec<Point>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    fn is_valid(&self) -> bool {
        !self.label.is_empty()
            && !self.points.is_empty()
            && self.points.iter().all(|p| p.is_finite())
    }
}

/// A labeled stroke already in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub label: String,
    pub points: Vec<Point>,
}

pub type TemplateSnapshot = Arc<Vec<Arc<Template>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[repr(u8)]
pub enum LoadState {
    Empty = 0,
    Loading = 1,
    Ready = 2,
}

impl LoadState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoadState::Empty,
            1 => LoadState::Loading,
            2 => LoadState::Ready,
            _ => unreachable!("invalid load state {value}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Template loading already started (state: {0})")]
    AlreadyStarted(LoadState),
}

#[derive(Debug)]
pub struct TemplateStore {
    normalizer: Normalizer,
    templates: ArcSwap<Vec<Arc<Template>>>,
    state: AtomicU8,
    ready: Notify,
}

impl TemplateStore {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            templates: ArcSwap::from_pointee(Vec::new()),
            state: AtomicU8::new(LoadState::Empty as u8),
            ready: Notify::new(),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True once the loader has finished. Matching does not wait for this.
    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// Resolves once loading has completed.
    pub async fn wait_ready(&self) {
        loop {
            let notified = self.ready.notified();
            if self.is_ready() {
                return;
            }
            notified.await;
        }
    }

    /// The templates that have landed so far.
    pub fn snapshot(&self) -> TemplateSnapshot {
        self.templates.load_full()
    }

    pub fn len(&self) -> usize {
        self.templates.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct labels in the order they were first loaded.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for template in self.templates.load().iter() {
            if !labels.contains(&template.label) {
                labels.push(template.label.clone());
            }
        }
        labels
    }

    /// Normalizes and appends every entry of `source`, then marks the store
    /// ready. Only one load may ever run per store. Returns how many
    /// templates were appended; entries with an empty label, no points or
    /// non-finite coordinates are skipped.
    pub fn load<I>(&self, source: I) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = TemplateEntry>,
    {
        self.state
            .compare_exchange(
                LoadState::Empty as u8,
                LoadState::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| LoadError::AlreadyStarted(LoadState::from_u8(current)))?;
        debug!("Template loading started");

        let mut appended = 0;
        for entry in source {
            if !entry.is_valid() {
                warn!(
                    "Skipping malformed template entry {:?} with {} points",
                    entry.label,
                    entry.points.len()
                );
                continue;
            }

            self.append(entry);
            appended += 1;
        }

        self.state.store(LoadState::Ready as u8, Ordering::Release);
        self.ready.notify_waiters();
        info!("Loaded {} gesture templates", appended);

        Ok(appended)
    }

    /// Runs [`TemplateStore::load`] on the blocking thread pool so file reads
    /// in the source iterator do not stall the async runtime.
    pub fn spawn_load<I>(self: &Arc<Self>, source: I) -> JoinHandle<Result<usize, LoadError>>
    where
        I: IntoIterator<Item = TemplateEntry> + Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || store.load(source))
    }

    fn append(&self, entry: TemplateEntry) {
        let (points, _) = self.normalizer.normalize(&entry.points);
        let template = Arc::new(Template {
            label: entry.label,
            points,
        });

        // Single writer: nothing else stores between load and store.
        let current = self.templates.load();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(template);
        self.templates.store(Arc::new(next));
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(Normalizer::default())
    }
}
