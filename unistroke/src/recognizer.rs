use std::sync::Arc;

use log::{debug, info};

use crate::config::RecognizerConfig;
use crate::geometry::Point;
use crate::matcher::Matcher;
use crate::normalizer::{NormalizationParams, Normalizer};
use crate::stroke::Stroke;
use crate::template::{LoadError, TemplateEntry, TemplateStore};
use crate::template_source::DirectorySource;

/// Outcome of recognizing one stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best template label, empty when no templates were available.
    pub label: String,
    /// The input in canonical form.
    pub candidate: Vec<Point>,
    /// The best template projected into the input's frame, for overlays.
    pub template: Vec<Point>,
    /// Display confidence in [0, 1].
    pub confidence: f64,
    /// Raw path distance; infinite when nothing matched.
    pub score: f64,
    pub params: NormalizationParams,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !self.template.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub label: String,
    pub score: f64,
    pub confidence: f64,
}

#[derive(Debug)]
pub struct Recognizer {
    config: RecognizerConfig,
    normalizer: Normalizer,
    matcher: Matcher,
    store: Arc<TemplateStore>,
}

impl Recognizer {
    /// A recognizer with an empty template store.
    pub fn new(config: RecognizerConfig) -> Self {
        config.validate();
        let normalizer = config.normalizer();

        Self {
            matcher: config.matcher(),
            store: Arc::new(TemplateStore::new(normalizer)),
            normalizer,
            config,
        }
    }

    pub fn with_templates<I>(config: RecognizerConfig, entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = TemplateEntry>,
    {
        let recognizer = Self::new(config);
        recognizer.store.load(entries)?;
        Ok(recognizer)
    }

    /// Builds a recognizer and starts loading `template_path` when set.
    /// Background loading spawns onto the current tokio runtime.
    pub fn from_config(config: RecognizerConfig) -> Self {
        let recognizer = Self::new(config);

        if let Some(path) = recognizer.config.template_path.clone() {
            let source = DirectorySource::new(&path);
            if recognizer.config.load_in_background {
                info!("Loading templates from {:?} in the background", path);
                // The store is fresh, so this load cannot be rejected.
                drop(recognizer.store.spawn_load(source));
            } else if let Err(err) = recognizer.store.load(source) {
                unreachable!("fresh template store rejected load: {err}");
            }
        }

        recognizer
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<TemplateStore> {
        &self.store
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalizes the stroke, matches it against the templates loaded so far
    /// and projects the winner back into the stroke's frame.
    pub fn recognize(&self, stroke: &Stroke) -> MatchResult {
        let (candidate, params) = self.normalizer.normalize(stroke.points());
        let templates = self.store.snapshot();
        let best = self.matcher.best_match(&candidate, &templates);

        if best.is_none() {
            debug!("No templates loaded, stroke of {} points unmatched", stroke.len());
            return MatchResult {
                label: String::new(),
                candidate,
                template: Vec::new(),
                confidence: 0.0,
                score: f64::INFINITY,
                params,
            };
        }

        let template = self.normalizer.denormalize(&best.points, &params);
        let confidence = self.matcher.confidence(best.score);
        debug!(
            "Recognized {:?} (score {:.3}, confidence {:.3}) among {} templates",
            best.label,
            best.score,
            confidence,
            templates.len()
        );

        MatchResult {
            label: best.label,
            candidate,
            template,
            confidence,
            score: best.score,
            params,
        }
    }

    /// The `limit` closest templates, best first.
    pub fn rank(&self, stroke: &Stroke, limit: usize) -> Vec<RankedMatch> {
        let (candidate, _) = self.normalizer.normalize(stroke.points());
        let templates = self.store.snapshot();

        self.matcher
            .rank(&candidate, &templates, limit)
            .into_iter()
            .map(|m| RankedMatch {
                confidence: self.matcher.confidence(m.score),
                label: m.label,
                score: m.score,
            })
            .collect()
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}
