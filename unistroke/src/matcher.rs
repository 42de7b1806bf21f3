//! Index-to-index path distance scoring against a template snapshot.

use std::sync::Arc;

use crate::geometry::Point;
use crate::template::Template;

pub const DEFAULT_CONFIDENCE_DECAY: f64 = 0.01;

/// Mean Euclidean distance between points at the same index.
///
/// Both sequences must be canonical strokes of the same length; anything
/// else is a caller bug and panics.
pub fn path_distance(a: &[Point], b: &[Point]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "path_distance needs equal-length point sequences"
    );
    assert!(!a.is_empty(), "path_distance of empty point sequences");

    let total: f64 = a.iter().zip(b.iter()).map(|(p, q)| p.distance(*q)).sum();
    total / a.len() as f64
}

/// Best template for a candidate. The "no match" sentinel has an empty
/// label, no points and an infinite score.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    pub label: String,
    pub points: Vec<Point>,
    pub score: f64,
}

impl TemplateMatch {
    pub fn none() -> Self {
        Self {
            label: String::new(),
            points: Vec::new(),
            score: f64::INFINITY,
        }
    }

    pub fn is_none(&self) -> bool {
        self.points.is_empty()
    }

    fn from_template(template: &Template, score: f64) -> Self {
        Self {
            label: template.label.clone(),
            points: template.points.clone(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    confidence_decay: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_DECAY)
    }
}

impl Matcher {
    pub fn new(confidence_decay: f64) -> Self {
        assert!(
            confidence_decay.is_finite() && confidence_decay > 0.0,
            "confidence_decay must be finite and positive"
        );
        Self { confidence_decay }
    }

    /// Linear scan keeping the smallest distance. On ties the earliest
    /// template in store order wins.
    pub fn best_match(&self, candidate: &[Point], templates: &[Arc<Template>]) -> TemplateMatch {
        let mut best: Option<(&Template, f64)> = None;

        for template in templates {
            let score = path_distance(candidate, &template.points);
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((&**template, score));
            }
        }

        best.map_or_else(TemplateMatch::none, |(template, score)| {
            TemplateMatch::from_template(template, score)
        })
    }

    /// All templates ordered by ascending distance, truncated to `limit`.
    /// Equal scores keep store order, so the head equals [`Matcher::best_match`].
    pub fn rank(
        &self,
        candidate: &[Point],
        templates: &[Arc<Template>],
        limit: usize,
    ) -> Vec<TemplateMatch> {
        let mut scored: Vec<(usize, f64)> = templates
            .iter()
            .enumerate()
            .map(|(idx, template)| (idx, path_distance(candidate, &template.points)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        scored
            .into_iter()
            .take(limit)
            .map(|(idx, score)| TemplateMatch::from_template(&templates[idx], score))
            .collect()
    }

    /// Maps a distance to (0, 1]: `exp(-decay * score)`. Display only.
    pub fn confidence(&self, score: f64) -> f64 {
        if score.is_nan() {
            return 0.0;
        }
        (-self.confidence_decay * score).exp()
    }
}
