//! Saves captured strokes as numbered gesture example files.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Local;
use common::FileFormat;
use log::info;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::gesture_file::{write_gesture_file, GestureFile, GesturePoint};
use crate::stroke::Stroke;

pub const APP_NAME: &str = "Gestures";
pub const APP_VERSION: &str = "1.0";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    #[default]
    Medium,
    Slow,
}

/// Folder name for a subject: blank means subject 1, short numbers are
/// zero-padded (`"7"` -> `"s07"`), anything else is used as is.
pub fn subject_folder(subject: &str) -> String {
    let subject = subject.trim();
    let subject = if subject.is_empty() { "1" } else { subject };

    match subject.parse::<u32>() {
        Ok(number) if subject.len() < 3 => format!("s{number:02}"),
        _ => format!("s{subject}"),
    }
}

#[derive(Debug, Clone)]
pub struct GestureWriter {
    root: PathBuf,
    subject: String,
    speed: Speed,
}

impl GestureWriter {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            subject: String::new(),
            speed: Speed::default(),
        }
    }

    pub fn with_subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    fn subject_or_default(&self) -> &str {
        match self.subject.trim() {
            "" => "1",
            subject => subject,
        }
    }

    pub fn save_dir(&self) -> PathBuf {
        self.root
            .join("custom")
            .join(subject_folder(&self.subject))
            .join(self.speed.to_string())
    }

    /// Next free `<base><NN>` name in the save directory, and its number.
    pub fn next_file_name(&self, base: &str) -> anyhow::Result<(String, u32)> {
        let dir = self.save_dir();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

        let mut max_number = 0;
        for entry in fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
            let name = entry.file_name();
            if let Some(number) = example_number(&name.to_string_lossy(), base) {
                max_number = max_number.max(number);
            }
        }

        let number = max_number + 1;
        Ok((format!("{base}{number:02}"), number))
    }

    /// Writes the stroke as the next numbered example of `base`. The stroke
    /// needs at least two points and capture timestamps.
    pub fn save(&self, base: &str, stroke: &Stroke) -> anyhow::Result<PathBuf> {
        if base.is_empty() {
            bail!("Gesture name is empty");
        }
        if stroke.len() < 2 {
            bail!("No stroke to save");
        }
        let Some(times) = stroke.timestamps() else {
            bail!("Stroke has no capture timestamps");
        };

        let (name, number) = self.next_file_name(base)?;
        let path = self
            .save_dir()
            .join(format!("{name}.{}", FileFormat::Xml.extension()));

        let t0 = times[0];
        let now = Local::now();
        let file = GestureFile {
            name,
            subject: Some(self.subject_or_default().to_string()),
            speed: Some(self.speed.to_string()),
            number: Some(number),
            milliseconds: Some(stroke.duration_ms()),
            app_name: Some(APP_NAME.to_string()),
            app_ver: Some(APP_VERSION.to_string()),
            date: Some(now.format("%A, %B %d, %Y").to_string()),
            time_of_day: Some(now.format("%I:%M:%S %p").to_string()),
            points: stroke
                .points()
                .iter()
                .zip(times)
                .map(|(p, &t)| GesturePoint {
                    x: p.x.trunc(),
                    y: p.y.trunc(),
                    t: Some(t - t0),
                })
                .collect(),
        };

        write_gesture_file(&file, &path).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Saved gesture {:?}", path);
        Ok(path)
    }
}

fn example_number(file_name: &str, base: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(base)?
        .strip_suffix(FileFormat::Xml.extension())?
        .strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
