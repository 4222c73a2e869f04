//! File-backed saved state
//!
//! Slots are kept in one JSON object on disk and cached in memory. Every
//! change rewrites the whole file through a temp file and a rename, so a
//! crash leaves either the previous contents or the new ones. The file holds
//! the password slot, so on unix it is readable by the owner only.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use pp_core::ports::{SavedStateError, SavedStatePort};
use tracing::{debug, error};

pub const DEFAULT_SAVED_STATE_FILE: &str = "saved_state.json";

type Slots = BTreeMap<String, String>;

pub struct JsonFileSavedState {
    path: PathBuf,
    slots: Mutex<Slots>,
}

impl JsonFileSavedState {
    /// Open the store at `path`, loading existing slots.
    ///
    /// A missing or empty file is an empty store; unparsable content is
    /// [`SavedStateError::Corrupt`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SavedStateError> {
        let path = path.into();
        let slots = load(&path)?;
        debug!(path = %path.display(), slots = slots.len(), "saved state loaded");
        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// Open `saved_state.json` inside `base_dir`.
    pub fn with_base_dir(base_dir: impl AsRef<Path>) -> Result<Self, SavedStateError> {
        Self::open(base_dir.as_ref().join(DEFAULT_SAVED_STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|poisoned| {
            error!("saved state mutex poisoned, recovering from poisoned state");
            poisoned.into_inner()
        })
    }

    fn atomic_write(&self, slots: &Slots) -> Result<(), SavedStateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SavedStateError::Io(format!("create dir {} failed: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(slots)
            .map_err(|e| SavedStateError::Io(format!("serialize saved state failed: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, json.as_bytes()).map_err(|e| {
            SavedStateError::Io(format!("write {} failed: {e}", tmp_path.display()))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            SavedStateError::Io(format!(
                "rename {} -> {} failed: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })
    }

    /// Apply `change` to the cache and persist it. The cache only moves
    /// forward once the write succeeded.
    fn update(&self, change: impl FnOnce(&mut Slots) -> bool) -> Result<(), SavedStateError> {
        let mut slots = self.slots();
        let mut next = slots.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.atomic_write(&next)?;
        *slots = next;
        Ok(())
    }
}

/// Write `content` to `path` with owner-only permissions on unix.
///
/// The mode is set on creation and again afterwards, since a stale temp file
/// keeps whatever mode it was created with.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        file.set_permissions(perms)?;
    }

    file.write_all(content)?;
    file.sync_all()
}

fn load(path: &Path) -> Result<Slots, SavedStateError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Slots::new()),
        Err(e) => {
            return Err(SavedStateError::Io(format!(
                "read {} failed: {e}",
                path.display()
            )))
        }
    };

    if content.trim().is_empty() {
        return Ok(Slots::new());
    }

    serde_json::from_str(&content)
        .map_err(|e| SavedStateError::Corrupt(format!("{}: {e}", path.display())))
}

impl SavedStatePort for JsonFileSavedState {
    fn get(&self, key: &str) -> Result<Option<String>, SavedStateError> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SavedStateError> {
        self.update(|slots| {
            if slots.get(key).map(String::as_str) == Some(value) {
                return false;
            }
            slots.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), SavedStateError> {
        self.update(|slots| slots.remove(key).is_some())
    }
}
