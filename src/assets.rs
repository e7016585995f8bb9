use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;

pub const BACKGROUND_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Tried in order when no font is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Where an asset's bytes come from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    File(PathBuf),
    Memory { name: String, data: Arc<[u8]> },
}

impl AssetSource {
    pub fn memory(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Memory { name, .. } => name.clone(),
        }
    }

    pub fn load(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            Self::File(path) => fs::read(path).map(Cow::Owned),
            Self::Memory { data, .. } => Ok(Cow::Borrowed(&data[..])),
        }
    }
}

/// Read-only set of images used for share cards. Shared across sessions.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    backgrounds: Vec<AssetSource>,
    qr: Option<AssetSource>,
    font: Option<AssetSource>,
}

impl AssetRegistry {
    pub fn new(
        backgrounds: Vec<AssetSource>,
        qr: Option<AssetSource>,
        font: Option<AssetSource>,
    ) -> Self {
        Self {
            backgrounds,
            qr,
            font,
        }
    }

    /// Builds the registry from configured (or default) locations on disk.
    pub fn discover(config: &Config) -> Self {
        let backgrounds_dir = config.backgrounds_dir();
        let backgrounds = match scan_backgrounds(&backgrounds_dir) {
            Ok(found) => found,
            Err(e) => {
                log::warn!(
                    "no share backgrounds in {}: {e}",
                    backgrounds_dir.display()
                );
                Vec::new()
            }
        };

        let font = config
            .font_path
            .clone()
            .or_else(find_system_font)
            .map(AssetSource::File);
        if font.is_none() {
            log::warn!("no font found, share cards will be rendered without text");
        }

        log::info!(
            "registered {} share background(s) from {}",
            backgrounds.len(),
            backgrounds_dir.display()
        );

        Self {
            backgrounds: backgrounds.into_iter().map(AssetSource::File).collect(),
            qr: Some(AssetSource::File(config.qr_path())),
            font,
        }
    }

    pub fn backgrounds(&self) -> &[AssetSource] {
        &self.backgrounds
    }

    pub fn qr(&self) -> Option<&AssetSource> {
        self.qr.as_ref()
    }

    pub fn font(&self) -> Option<&AssetSource> {
        self.font.as_ref()
    }
}

fn is_background_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            BACKGROUND_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name.
pub fn scan_backgrounds(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_background_file(path))
        .collect();
    found.sort();
    Ok(found)
}

fn find_system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(|candidate| PathBuf::from(*candidate))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt", "c.webp", "d.jpeg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found = scan_backgrounds(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.webp", "d.jpeg"]);
    }

    #[test]
    fn test_scan_missing_dir_errors() {
        let dir = tempdir().unwrap();
        assert!(scan_backgrounds(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_discover_with_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let config = Config {
            backgrounds_dir: Some(dir.path().join("absent")),
            qr_path: Some(dir.path().join("qr.png")),
            ..Config::default()
        };
        let registry = AssetRegistry::discover(&config);
        assert!(registry.backgrounds().is_empty());
        assert_eq!(registry.qr().unwrap().name(), "qr.png");
    }

    #[test]
    fn test_memory_source() {
        let source = AssetSource::memory("bg-1", vec![1u8, 2, 3]);
        assert_eq!(source.name(), "bg-1");
        assert_eq!(&*source.load().unwrap(), &[1u8, 2, 3][..]);
    }

    #[test]
    fn test_file_source_missing() {
        let dir = tempdir().unwrap();
        let source = AssetSource::File(dir.path().join("gone.png"));
        assert_eq!(source.name(), "gone.png");
        assert!(source.load().is_err());
    }
}
