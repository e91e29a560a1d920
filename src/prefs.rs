//! Durable client state on the local filesystem.
//! Two small JSON documents live under the configured data directory: the
//! backend session token (with a cached principal snapshot) and the theme
//! preference. Writes go through a temp file and rename; corrupt or missing
//! files read as absent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::identity::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub principal: Principal,
}

#[derive(Clone)]
pub struct PrefsStore {
    root: PathBuf,
}

impl PrefsStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::internal("prefs_dir".into(), e.to_string()))?;
        Ok(Self { root })
    }

    fn session_path(&self) -> PathBuf { self.root.join("session.json") }
    fn theme_path(&self) -> PathBuf { self.root.join("theme.json") }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| AppError::internal("prefs_write".into(), e.to_string()))
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let bytes = fs::read(path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "pawhaven", "ignoring corrupt prefs file {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn save_session(&self, session: &StoredSession) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| AppError::internal("prefs_encode".into(), e.to_string()))?;
        self.write_atomic(&self.session_path(), &bytes)
    }

    pub fn load_session(&self) -> Option<StoredSession> {
        self.read_json(&self.session_path())
    }

    pub fn clear_session(&self) {
        // Removal failure is not actionable beyond logging; the in-memory
        // token slot is the authority once cleared.
        if let Err(e) = fs::remove_file(self.session_path()) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(target: "pawhaven", "failed to remove stored session: {}", e);
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> AppResult<()> {
        let bytes = serde_json::to_vec(&serde_json::json!({ "theme": theme }))
            .map_err(|e| AppError::internal("prefs_encode".into(), e.to_string()))?;
        self.write_atomic(&self.theme_path(), &bytes)
    }

    pub fn load_theme(&self) -> Theme {
        #[derive(Deserialize)]
        struct ThemeDoc { theme: Theme }
        self.read_json::<ThemeDoc>(&self.theme_path())
            .map(|d| d.theme)
            .unwrap_or_default()
    }
}
