//! Template-based unistroke gesture recognition.
//!
//! A raw stroke is resampled to a fixed point count, rotated so its starting
//! direction is canonical, scaled into a square and centered. It is then
//! compared index-by-index against every stored template, and the closest
//! template is reported together with a display confidence and its outline
//! projected back into the stroke's own frame.
//!
//! ```ignore
//! use unistroke::{Recognizer, RecognizerConfig, Stroke, TemplateEntry};
//!
//! let recognizer = Recognizer::with_templates(RecognizerConfig::default(), entries)?;
//! let result = recognizer.recognize(&Stroke::from_xy(points)?);
//! println!("{} ({:.2})", result.label, result.confidence);
//! ```

pub mod config;
pub mod debounce;
pub mod geometry;
pub mod gesture_file;
pub mod gesture_writer;
pub mod matcher;
pub mod normalizer;
pub mod recognizer;
pub mod stroke;
pub mod template;
pub mod template_source;

pub use config::RecognizerConfig;
pub use geometry::Point;
pub use matcher::{path_distance, Matcher, TemplateMatch};
pub use normalizer::{NormalizationParams, Normalizer};
pub use recognizer::{MatchResult, RankedMatch, Recognizer};
pub use stroke::{Stroke, StrokeError};
pub use template::{LoadError, LoadState, Template, TemplateEntry, TemplateStore};
pub use template_source::DirectorySource;
