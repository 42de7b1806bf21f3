//! Directory-backed template feed.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use common::file_format::get_file_extension;
use common::FileFormat;

use crate::gesture_file::{label_from_file_name, read_gesture_file};
use crate::template::TemplateEntry;

const PROGRESS_STEP: usize = 5;

/// Returns every gesture file below `root`, in sorted path order.
/// Hidden directories and notebook checkpoint directories are skipped.
pub fn gesture_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_gesture_files(root, &mut files);
    files.sort();
    files
}

fn collect_gesture_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to read template directory {:?}: {}", dir, err);
            return;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if !name.starts_with('.') && !name.contains("checkpoint") {
                collect_gesture_files(&path, files);
            }
        } else if is_gesture_file(&name) {
            files.push(path);
        }
    }
}

fn is_gesture_file(file_name: &str) -> bool {
    get_file_extension(file_name).is_some_and(|ext| {
        FileFormat::EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Lazily reads gesture files from a directory tree, yielding one
/// [`TemplateEntry`] per readable file. Files that fail to parse, have no
/// derivable label or hold no points are logged and skipped.
#[derive(Debug)]
pub struct DirectorySource {
    files: std::vec::IntoIter<PathBuf>,
    total: usize,
    visited: usize,
}

impl DirectorySource {
    pub fn new(root: &Path) -> Self {
        let files = if root.exists() {
            gesture_files(root)
        } else {
            warn!("Template path {:?} does not exist", root);
            Vec::new()
        };
        info!("Found {} gesture files under {:?}", files.len(), root);

        Self {
            total: files.len(),
            files: files.into_iter(),
            visited: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn read_entry(path: &Path) -> Option<TemplateEntry> {
        let file_name = path.file_name()?.to_string_lossy();
        let Some(label) = label_from_file_name(&file_name) else {
            warn!("Skipping {:?}: no label in file name", path);
            return None;
        };

        let file = match read_gesture_file(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Skipping {:?}: {}", path, err);
                return None;
            }
        };
        if file.points.is_empty() {
            warn!("Skipping {:?}: no points", path);
            return None;
        }

        Some(file.to_entry(label))
    }

    fn report_progress(&self) {
        if self.visited % PROGRESS_STEP == 0 || self.visited == self.total {
            info!(
                "Loading gesture templates: {}/{}",
                self.visited, self.total
            );
        }
    }
}

impl Iterator for DirectorySource {
    type Item = TemplateEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(path) = self.files.next() {
            self.visited += 1;
            let entry = Self::read_entry(&path);
            self.report_progress();
            if entry.is_some() {
                return entry;
            }
        }
        None
    }
}
