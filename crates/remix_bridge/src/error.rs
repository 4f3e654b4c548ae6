//! Error types for the renderer boundary

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::bridge::LifecycleState;
use crate::ffi::ErrorCode;

/// Renderer entity kinds that own handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `remixapi_MeshHandle`
    Mesh,
    /// `remixapi_MaterialHandle`
    Material,
    /// `remixapi_LightHandle`
    Light,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "mesh",
            Self::Material => "material",
            Self::Light => "light",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The renderer binary could not be mapped into the process
    #[error("Failed to load renderer library {}: {source}", .path.display())]
    LoadFailed {
        /// Path handed to the OS loader
        path: PathBuf,
        /// OS-level cause
        #[source]
        source: libloading::Error,
    },

    /// The entry-point table could not be fully populated
    #[error("Failed to bind renderer library {}: {reason}", .path.display())]
    BindFailed {
        /// Path of the loaded binary
        path: PathBuf,
        /// What was missing or rejected
        reason: String,
    },

    /// Another live bridge already holds a binding to this library
    #[error("Renderer library {} is already bound by another bridge", .path.display())]
    AlreadyBound {
        /// Path of the contested binary
        path: PathBuf,
    },

    /// `Startup` rejected the parameters or failed internally
    #[error("Renderer startup failed: {code}")]
    StartupFailed {
        /// Native status code
        code: ErrorCode,
    },

    /// A create call returned a non-success code; no handle was issued
    #[error("Failed to create {kind}: {code}")]
    CreateFailed {
        /// Entity kind
        kind: ResourceKind,
        /// Native status code
        code: ErrorCode,
    },

    /// A destroy call returned a non-success code; the handle is gone regardless
    #[error("Failed to destroy {kind}: {code}")]
    DestroyFailed {
        /// Entity kind
        kind: ResourceKind,
        /// Native status code
        code: ErrorCode,
    },

    /// A forwarded call returned a non-success code
    #[error("Renderer call {op} failed: {code}")]
    RendererNative {
        /// Renderer entry point name
        op: &'static str,
        /// Native status code
        code: ErrorCode,
    },

    /// The handle was destroyed, or belongs to an earlier lifecycle
    #[error("Stale {kind} handle")]
    StaleHandle {
        /// Entity kind
        kind: ResourceKind,
    },

    /// Scene or frame call made outside the `Started` state
    #[error("Renderer is not started (state: {state})")]
    NotStarted {
        /// State at the time of the call
        state: LifecycleState,
    },

    /// The table slot for an entry point is empty
    #[error("Renderer entry point {entry} is not bound")]
    EntryUnbound {
        /// Renderer entry point name
        entry: &'static str,
    },

    /// A caller-supplied value cannot cross the boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl BridgeError {
    /// Native status code carried by this error, if the renderer produced one
    pub fn native_code(&self) -> Option<ErrorCode> {
        match self {
            Self::StartupFailed { code }
            | Self::CreateFailed { code, .. }
            | Self::DestroyFailed { code, .. }
            | Self::RendererNative { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
