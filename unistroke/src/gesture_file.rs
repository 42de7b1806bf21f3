//! Persisted gesture examples.
//!
//! XML files follow the `<Gesture Name=".."><Point X=".." Y=".." T=".."/></Gesture>`
//! layout of the unistroke gesture logs. YAML and JSON files carry the same
//! data under the snake_case field names of [`GestureFile`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use common::FileFormat;

use crate::geometry::Point;
use crate::stroke::{Stroke, StrokeResult};
use crate::template::TemplateEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturePoint {
    pub x: f64,
    pub y: f64,
    /// Milliseconds since the first point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milliseconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_ver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub points: Vec<GesturePoint>,
}

impl GestureFile {
    pub fn raw_points(&self) -> Vec<Point> {
        self.points.iter().map(|p| Point::new(p.x, p.y)).collect()
    }

    pub fn to_entry<S: Into<String>>(&self, label: S) -> TemplateEntry {
        TemplateEntry::new(label, self.raw_points())
    }

    /// The recorded stroke, with timestamps when every point carries one.
    pub fn to_stroke(&self) -> StrokeResult<Stroke> {
        let timestamps: Option<Vec<u64>> = self.points.iter().map(|p| p.t).collect();
        match timestamps {
            Some(timestamps) => Stroke::with_timestamps(self.raw_points(), timestamps),
            None => Stroke::new(self.raw_points()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "Gesture")]
struct XmlGesture {
    #[serde(rename = "@Name", default)]
    name: String,
    #[serde(rename = "@Subject", default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(rename = "@Speed", default, skip_serializing_if = "Option::is_none")]
    speed: Option<String>,
    #[serde(rename = "@Number", default, skip_serializing_if = "Option::is_none")]
    number: Option<u32>,
    #[serde(rename = "@NumPts", default, skip_serializing_if = "Option::is_none")]
    num_pts: Option<usize>,
    // Spelling matches the published gesture logs.
    #[serde(rename = "@Millseconds", default, skip_serializing_if = "Option::is_none")]
    milliseconds: Option<u64>,
    #[serde(rename = "@AppName", default, skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
    #[serde(rename = "@AppVer", default, skip_serializing_if = "Option::is_none")]
    app_ver: Option<String>,
    #[serde(rename = "@Date", default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "@TimeOfDay", default, skip_serializing_if = "Option::is_none")]
    time_of_day: Option<String>,
    #[serde(rename = "Point", default)]
    points: Vec<XmlPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlPoint {
    #[serde(rename = "@X")]
    x: f64,
    #[serde(rename = "@Y")]
    y: f64,
    #[serde(rename = "@T", default, skip_serializing_if = "Option::is_none")]
    t: Option<u64>,
}

impl From<XmlGesture> for GestureFile {
    fn from(xml: XmlGesture) -> Self {
        Self {
            name: xml.name,
            subject: xml.subject,
            speed: xml.speed,
            number: xml.number,
            milliseconds: xml.milliseconds,
            app_name: xml.app_name,
            app_ver: xml.app_ver,
            date: xml.date,
            time_of_day: xml.time_of_day,
            points: xml
                .points
                .into_iter()
                .map(|p| GesturePoint {
                    x: p.x,
                    y: p.y,
                    t: p.t,
                })
                .collect(),
        }
    }
}

impl From<&GestureFile> for XmlGesture {
    fn from(file: &GestureFile) -> Self {
        Self {
            name: file.name.clone(),
            subject: file.subject.clone(),
            speed: file.speed.clone(),
            number: file.number,
            num_pts: Some(file.points.len()),
            milliseconds: file.milliseconds,
            app_name: file.app_name.clone(),
            app_ver: file.app_ver.clone(),
            date: file.date.clone(),
            time_of_day: file.time_of_day.clone(),
            points: file
                .points
                .iter()
                .map(|p| XmlPoint {
                    x: p.x,
                    y: p.y,
                    t: p.t,
                })
                .collect(),
        }
    }
}

pub fn parse_gesture(text: &str, format: FileFormat) -> anyhow::Result<GestureFile> {
    match format {
        FileFormat::Xml => {
            let xml: XmlGesture = common::serde::deserialize(text, format)?;
            Ok(xml.into())
        }
        FileFormat::Yaml | FileFormat::Json => common::serde::deserialize(text, format),
    }
}

pub fn serialize_gesture(file: &GestureFile, format: FileFormat) -> anyhow::Result<String> {
    match format {
        FileFormat::Xml => common::serde::serialize(&XmlGesture::from(file), format),
        FileFormat::Yaml | FileFormat::Json => common::serde::serialize(file, format),
    }
}

pub fn read_gesture_file(path: &Path) -> anyhow::Result<GestureFile> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_gesture(&text, format)
}

pub fn write_gesture_file(file: &GestureFile, path: &Path) -> anyhow::Result<()> {
    let format = FileFormat::from_path(path)?;
    std::fs::write(path, serialize_gesture(file, format)?)?;
    Ok(())
}

/// Template label for an example file: the name up to the first `.` with
/// the trailing example number removed, e.g. `circle03.xml` -> `circle`.
pub fn label_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.split('.').next().unwrap_or_default();
    let label = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}
