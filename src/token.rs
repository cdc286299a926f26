//! Bearer token persistence.
//!
//! The session token lives outside process memory so a new invocation can
//! resume an authenticated session. `FileTokenStore` keeps it in a JSON file
//! with restricted permissions (0600); tokens are never logged in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Where the current session token is kept between requests.
///
/// One token at a time: `save` replaces any previous token, `clear` removes
/// it. Implementations must tolerate a missing backing store (`load` returns
/// `Ok(None)`, `clear` succeeds).
pub trait TokenStore: Send + Sync {
    /// Load the current token, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Persist a token, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token.
    fn clear(&self) -> Result<()>;
}

/// On-disk token file contents.
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Token store backed by a JSON file on disk.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path. The file is created
    /// lazily on the first `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;

        let file: TokenFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file {}", self.path.display()))?;

        Ok(Some(file.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&TokenFile {
            token: token.to_string(),
        })
        .context("Failed to serialize token")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove token file {}", self.path.display())),
        }
    }
}

/// In-memory token store for tests and embedding.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().expect("token lock poisoned").clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().expect("token lock poisoned") = None;
        Ok(())
    }
}

/// Returns a masked version of a token for display and logs. Tokens short
/// enough that a prefix would expose most of them are hidden entirely.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 24 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{}...", prefix)
}
