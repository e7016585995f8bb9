use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::share::ShareImage;

const FILE_PREFIX: &str = "number-compare";

/// `number-compare-<unix millis>.png`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{FILE_PREFIX}-{}.png", at.timestamp_millis())
}

/// Writes the card into `dir`, creating it if needed. Returns the file path.
pub fn save_share_image(dir: &Path, image: &ShareImage, at: DateTime<Utc>) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(at));
    fs::write(&path, &image.png)?;
    log::info!("share card exported to {}", path.display());
    Ok(path)
}
