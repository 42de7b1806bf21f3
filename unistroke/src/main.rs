use std::path::PathBuf;

use anyhow::{bail, Result};
use log::{error, info};

use common::log_setup::setup_logging;
use unistroke::gesture_file::read_gesture_file;
use unistroke::{Recognizer, RecognizerConfig};

const CONFIG_FILE: &str = "unistroke.yaml";

/// Recognizes each gesture file given on the command line against the
/// template directory configured in `unistroke.yaml`.
fn main() -> Result<()> {
    let _logger = setup_logging("info");

    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if files.is_empty() {
        bail!("usage: unistroke <gesture.xml>...");
    }

    let config = RecognizerConfig::load_or_default(&PathBuf::from(CONFIG_FILE));
    let recognizer = Recognizer::from_config(RecognizerConfig {
        load_in_background: false,
        ..config
    });
    info!("{} templates ready", recognizer.store().len());

    for path in &files {
        let stroke = match read_gesture_file(path).and_then(|g| Ok(g.to_stroke()?)) {
            Ok(stroke) => stroke,
            Err(err) => {
                error!("Failed to read {:?}: {}", path, err);
                continue;
            }
        };

        let result = recognizer.recognize(&stroke);
        if result.is_match() {
            println!(
                "{}: {} ({:.3}, score {:.2})",
                path.display(),
                result.label,
                result.confidence,
                result.score
            );
        } else {
            println!("{}: no templates", path.display());
        }
    }

    Ok(())
}
