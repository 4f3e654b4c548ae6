//! Startup and present parameters

use std::ffi::c_void;
use std::ptr;

use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};

use crate::config::StartupConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{to_bool, PresentInfo, StartupInfo, StructType};

/// Native window the renderer presents into (`HWND`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow(*mut c_void);

// The handle is only passed through to the renderer, never dereferenced here.
unsafe impl Send for NativeWindow {}
unsafe impl Sync for NativeWindow {}

impl NativeWindow {
    /// Wrap a raw `HWND`
    pub fn from_raw(hwnd: *mut c_void) -> Self {
        Self(hwnd)
    }

    /// No window; the renderer runs headless or the caller fetches output
    /// itself
    pub fn null() -> Self {
        Self(ptr::null_mut())
    }

    /// Extract the `HWND` from a platform handle
    pub fn from_raw_window_handle(handle: RawWindowHandle) -> BridgeResult<Self> {
        match handle {
            RawWindowHandle::Win32(win32) => Ok(Self(win32.hwnd)),
            other => Err(BridgeError::InvalidArgument(format!(
                "renderer needs a Win32 window, got {other:?}"
            ))),
        }
    }

    /// Extract the `HWND` from any windowing library handle
    pub fn from_window<W: HasRawWindowHandle>(window: &W) -> BridgeResult<Self> {
        Self::from_raw_window_handle(window.raw_window_handle())
    }

    /// Raw `HWND`
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Whether no window is attached
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for NativeWindow {
    fn default() -> Self {
        Self::null()
    }
}

/// Parameters for `Startup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartupParams {
    /// Window the renderer presents into by default
    pub window: NativeWindow,
    /// Skip the sRGB conversion of the final output
    pub disable_srgb_conversion_for_output: bool,
    /// Do not present through a Vulkan swapchain
    pub force_no_vk_swapchain: bool,
    /// Start with the renderer's editor tooling enabled
    pub editor_mode_enabled: bool,
}

impl StartupParams {
    /// Default flags for `window`
    pub fn new(window: NativeWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Flags taken from configuration
    pub fn from_config(window: NativeWindow, config: &StartupConfig) -> Self {
        Self {
            window,
            disable_srgb_conversion_for_output: config.disable_srgb_conversion_for_output,
            force_no_vk_swapchain: config.force_no_vk_swapchain,
            editor_mode_enabled: config.editor_mode_enabled,
        }
    }

    pub(crate) fn lower(&self) -> StartupInfo {
        StartupInfo {
            s_type: StructType::STARTUP_INFO,
            p_next: ptr::null_mut(),
            hwnd: self.window.as_ptr(),
            disable_srgb_conversion_for_output: to_bool(self.disable_srgb_conversion_for_output),
            force_no_vk_swapchain: to_bool(self.force_no_vk_swapchain),
            editor_mode_enabled: to_bool(self.editor_mode_enabled),
        }
    }
}

/// Parameters for `Present`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentParams {
    /// Present into this window instead of the startup one
    pub window_override: NativeWindow,
}

impl PresentParams {
    /// Present into `window_override`
    pub fn new(window_override: NativeWindow) -> Self {
        Self { window_override }
    }

    pub(crate) fn lower(&self) -> PresentInfo {
        PresentInfo {
            s_type: StructType::PRESENT_INFO,
            p_next: ptr::null_mut(),
            hwnd_override: self.window_override.as_ptr(),
        }
    }
}
