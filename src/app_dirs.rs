use directories::{ProjectDirs, UserDirs};
use std::path::PathBuf;

const APP_NAME: &str = "number-compare";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("number-compare_config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("number-compare.log"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("number-compare.log"))
        }
    }

    /// Directory holding `share-backgrounds/` and `qr.png`.
    pub fn assets_dir() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("assets"))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }

    pub fn default_backgrounds_dir() -> PathBuf {
        Self::assets_dir().join("share-backgrounds")
    }

    pub fn default_qr_path() -> PathBuf {
        Self::assets_dir().join("qr.png")
    }

    /// Where exported share cards land when no export dir is configured.
    pub fn default_export_dir() -> PathBuf {
        UserDirs::new()
            .and_then(|ud| {
                ud.picture_dir()
                    .or(ud.download_dir())
                    .map(|p| p.to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
