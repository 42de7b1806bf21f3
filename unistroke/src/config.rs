use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::matcher::{Matcher, DEFAULT_CONFIDENCE_DECAY};
use crate::normalizer::{Normalizer, DEFAULT_NUM_POINTS, DEFAULT_SQUARE_SIZE};

/// Recognizer settings. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Points per canonical stroke.
    pub num_points: usize,
    /// Edge length of the square canonical strokes are scaled into.
    pub square_size: f64,
    /// Decay constant of the score to confidence mapping.
    pub confidence_decay: f64,
    /// Directory of gesture files to load templates from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
    /// Load templates on a background task instead of blocking construction.
    pub load_in_background: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
            square_size: DEFAULT_SQUARE_SIZE,
            confidence_decay: DEFAULT_CONFIDENCE_DECAY,
            template_path: None,
            load_in_background: false,
        }
    }
}

impl RecognizerConfig {
    pub fn validate(&self) {
        assert!(self.num_points >= 2, "num_points must be at least 2");
        assert!(
            self.square_size.is_finite() && self.square_size > 0.0,
            "square_size must be finite and positive"
        );
        assert!(
            self.confidence_decay.is_finite() && self.confidence_decay > 0.0,
            "confidence_decay must be finite and positive"
        );
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.num_points, self.square_size)
    }

    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.confidence_decay)
    }

    /// Reads a YAML or JSON config, picked by file extension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        common::serde::read_file(path)
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!("Using default recognizer config, failed to read {:?}: {}", path, err);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        common::serde::write_file(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: RecognizerConfig =
            common::serde::deserialize("num_points: 32\n", common::FileFormat::Yaml).unwrap();

        assert_eq!(config.num_points, 32);
        assert_eq!(config.square_size, DEFAULT_SQUARE_SIZE);
        assert_eq!(config.confidence_decay, DEFAULT_CONFIDENCE_DECAY);
        assert!(config.template_path.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recognizer.yaml");
        let config = RecognizerConfig {
            template_path: Some(PathBuf::from("datasets/xml_logs")),
            load_in_background: true,
            ..RecognizerConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(RecognizerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn saved_yaml_omits_unset_template_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recognizer.yaml");
        RecognizerConfig::default().save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_yml::Value = serde_yml::from_str(&text).unwrap();
        assert_eq!(value["num_points"].as_u64(), Some(64));
        assert!(value.get("template_path").is_none());
        assert_eq!(value["load_in_background"].as_bool(), Some(false));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecognizerConfig::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(config, RecognizerConfig::default());
    }

    #[test]
    #[should_panic(expected = "confidence_decay must be finite and positive")]
    fn validate_rejects_zero_decay() {
        RecognizerConfig {
            confidence_decay: 0.0,
            ..RecognizerConfig::default()
        }
        .validate();
    }
}
