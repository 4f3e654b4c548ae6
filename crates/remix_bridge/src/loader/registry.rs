//! Process-wide record of bound renderer libraries
//!
//! The renderer keeps global state per loaded binary, so at most one bridge
//! may bind a given library at a time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::error::{BridgeError, BridgeResult};

fn active_bindings() -> &'static Mutex<HashSet<PathBuf>> {
    static ACTIVE: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    ACTIVE.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Exclusive claim on a library path, released on drop
#[derive(Debug)]
pub(crate) struct BindingClaim {
    key: PathBuf,
}

impl BindingClaim {
    /// Claim `path`, failing if another live claim holds it
    pub(crate) fn acquire(path: &Path) -> BridgeResult<Self> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut active = active_bindings().lock().unwrap_or_else(PoisonError::into_inner);

        if !active.insert(key.clone()) {
            return Err(BridgeError::AlreadyBound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { key })
    }
}

impl Drop for BindingClaim {
    fn drop(&mut self) {
        active_bindings()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
