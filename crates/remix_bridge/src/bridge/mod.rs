//! Renderer lifecycle
//!
//! [`RemixBridge`] owns everything bound from the renderer binary: the mapped
//! library, its entry-point table and the handle arenas. Scene and frame calls
//! live in [`resources`] and [`frame`] as further `impl RemixBridge` blocks.

mod frame;
mod params;
mod resources;

#[cfg(test)]
mod mock;

pub use params::{NativeWindow, PresentParams, StartupParams};
pub use resources::{LightHandle, MaterialHandle, MeshHandle};

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::ffi::FunctionTable;
use crate::loader::{BindingClaim, DynamicBinder, LibraryBinder, LibraryHandle, LibraryLocator};
use resources::ResourceArenas;

/// Where a bridge is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No library mapped
    Unloaded,
    /// Library mapped and entry points bound; renderer not started
    Loaded,
    /// Scene and frame calls are accepted
    Started,
    /// Torn down; `load()` starts a fresh cycle
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unloaded => "Unloaded",
            Self::Loaded => "Loaded",
            Self::Started => "Started",
            Self::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

/// Bridge shared between threads behind a single lock
pub type SharedBridge = Arc<Mutex<RemixBridge>>;

/// Owner of one binding to the renderer
///
/// ```no_run
/// use remix_bridge::prelude::*;
///
/// let mut bridge = RemixBridge::new(BridgeConfig::default());
/// bridge.init(&StartupParams::new(NativeWindow::null()))?;
/// // create resources, then per frame: setup_camera, draw_*, present
/// bridge.destroy()?;
/// # Ok::<(), BridgeError>(())
/// ```
pub struct RemixBridge {
    config: BridgeConfig,
    binder: Box<dyn LibraryBinder>,
    state: LifecycleState,
    table: FunctionTable,
    library: Option<LibraryHandle>,
    claim: Option<BindingClaim>,
    resources: ResourceArenas,
}

impl RemixBridge {
    /// Bridge that loads the renderer through the OS dynamic loader
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_binder(config, Box::new(DynamicBinder::new()))
    }

    /// Bridge with a custom binder
    pub fn with_binder(config: BridgeConfig, binder: Box<dyn LibraryBinder>) -> Self {
        Self {
            config,
            binder,
            state: LifecycleState::Unloaded,
            table: FunctionTable::default(),
            library: None,
            claim: None,
            resources: ResourceArenas::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Configuration the bridge was created with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Path of the currently mapped library
    pub fn library_path(&self) -> Option<&Path> {
        self.library.as_ref().map(LibraryHandle::path)
    }

    /// Locate, map and bind the renderer binary
    ///
    /// A no-op when already loaded. Fails with `AlreadyBound` if another live
    /// bridge holds the same library.
    pub fn load(&mut self) -> BridgeResult<()> {
        if matches!(self.state, LifecycleState::Loaded | LifecycleState::Started) {
            log::debug!("Renderer library already loaded");
            return Ok(());
        }

        let located = LibraryLocator::from_config(&self.config).locate();
        let claim = BindingClaim::acquire(&located.path)?;
        let bound = self.binder.load(&located.path).map_err(|e| {
            log::error!("{e}");
            e
        })?;

        self.table = bound.table;
        self.library = Some(bound.handle);
        self.claim = Some(claim);
        self.state = LifecycleState::Loaded;
        log::info!("Renderer library bound from {}", located.path.display());
        Ok(())
    }

    /// Start the renderer, loading the library first if needed
    ///
    /// On success the configured renderer options are applied. Starting an
    /// already started bridge succeeds without a second `Startup`.
    pub fn startup(&mut self, params: &StartupParams) -> BridgeResult<()> {
        match self.state {
            LifecycleState::Started => {
                log::debug!("Renderer already started");
                return Ok(());
            }
            LifecycleState::Unloaded | LifecycleState::Stopped => self.load()?,
            LifecycleState::Loaded => {}
        }

        let startup = bound(self.table.startup, "Startup")?;
        let info = params.lower();
        // SAFETY: the table was filled by the library held in `self.library`.
        let code = unsafe { startup(&info) };
        if !code.is_success() {
            log::error!("Renderer startup failed: {code}");
            return Err(BridgeError::StartupFailed { code });
        }

        self.state = LifecycleState::Started;
        log::info!("Renderer started");

        let variables: Vec<(String, String)> = self
            .config
            .config_variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in variables {
            if let Err(e) = self.set_config_variable(&key, &value) {
                log::warn!("Couldn't apply renderer option {key}={value}: {e}");
            }
        }
        Ok(())
    }

    /// Load and start in one step
    pub fn init(&mut self, params: &StartupParams) -> BridgeResult<()> {
        self.load()?;
        self.startup(params)
    }

    /// Shut the renderer down and release the library
    ///
    /// Handles from this cycle become stale. Calling it on a bridge that is
    /// not loaded does nothing, so the library is never released twice. A
    /// failing `Shutdown` is reported after teardown completes.
    pub fn destroy(&mut self) -> BridgeResult<()> {
        if matches!(self.state, LifecycleState::Unloaded | LifecycleState::Stopped) {
            log::debug!("Renderer not loaded; nothing to tear down");
            return Ok(());
        }

        let code = self.table.shutdown.map(|shutdown| {
            // SAFETY: the library backing the table is still mapped.
            unsafe { shutdown() }
        });

        self.library = None;
        self.table = FunctionTable::default();
        self.claim = None;
        self.resources.clear();
        self.state = LifecycleState::Stopped;
        log::info!("Renderer shut down");

        match code {
            Some(code) if !code.is_success() => {
                log::warn!("Renderer shutdown reported {code}");
                Err(BridgeError::RendererNative { op: "Shutdown", code })
            }
            _ => Ok(()),
        }
    }

    /// Move the bridge behind a lock for multi-threaded use
    pub fn into_shared(self) -> SharedBridge {
        Arc::new(Mutex::new(self))
    }

    /// Fetch an entry point, rejecting calls outside `Started`
    fn entry<F>(&self, select: impl FnOnce(&FunctionTable) -> Option<F>, name: &'static str) -> BridgeResult<F> {
        if self.state != LifecycleState::Started {
            return Err(BridgeError::NotStarted { state: self.state });
        }
        bound(select(&self.table), name)
    }
}

fn bound<F>(entry: Option<F>, name: &'static str) -> BridgeResult<F> {
    entry.ok_or(BridgeError::EntryUnbound { entry: name })
}

impl fmt::Debug for RemixBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemixBridge")
            .field("state", &self.state)
            .field("library", &self.library)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

impl Drop for RemixBridge {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            log::error!("Renderer teardown failed: {e}");
        }
    }
}
