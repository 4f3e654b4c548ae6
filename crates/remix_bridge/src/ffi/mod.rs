//! Raw C ABI of the Remix renderer
//!
//! Everything here is a plain mirror of `remix_c.h`. Safe wrappers live in
//! [`crate::bridge`]; descriptor lowering lives in [`crate::scene`].

mod error_code;
mod table;
mod types;

pub use error_code::ErrorCode;
pub use table::*;
pub use types::*;

use std::path::Path;

/// NUL-terminated `wchar_t` buffer for `remixapi_Path` fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideString(Vec<WChar>);

impl WideString {
    /// Encode a path, appending the terminator
    pub fn from_path(path: &Path) -> Self {
        Self::from_str_lossy(&path.to_string_lossy())
    }

    /// Encode a string, appending the terminator
    pub fn from_str_lossy(text: &str) -> Self {
        #[cfg(windows)]
        let mut units: Vec<WChar> = text.encode_utf16().collect();
        #[cfg(not(windows))]
        let mut units: Vec<WChar> = text.chars().map(WChar::from).collect();
        units.push(0);
        Self(units)
    }

    /// Pointer to the first unit; valid while `self` is alive and unmoved
    /// (the buffer is heap allocated, so moving the `WideString` is fine)
    pub fn as_ptr(&self) -> *const WChar {
        self.0.as_ptr()
    }

    /// Units including the terminator
    pub fn units(&self) -> &[WChar] {
        &self.0
    }
}

/// Pointer to a slice, or null for an empty one
pub(crate) fn slice_ptr<T>(values: &[T]) -> *const T {
    if values.is_empty() {
        std::ptr::null()
    } else {
        values.as_ptr()
    }
}
