//! Renderer status codes

use std::fmt;

/// Status code returned by every Remix API entry point (`remixapi_ErrorCode`)
///
/// Codes this crate does not know about are preserved untouched and print
/// numerically; the bridge never invents codes of its own.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ErrorCode(pub i32);

#[allow(clippy::cast_possible_wrap)]
impl ErrorCode {
    /// The call succeeded
    pub const SUCCESS: Self = Self(0);
    /// Unspecified failure inside the renderer
    pub const GENERAL_FAILURE: Self = Self(1);
    /// `LoadLibrary` failed for the renderer binary
    pub const LOAD_LIBRARY_FAILURE: Self = Self(2);
    /// An argument was rejected
    pub const INVALID_ARGUMENTS: Self = Self(3);
    /// The bootstrap export could not be found
    pub const GET_PROC_ADDRESS_FAILURE: Self = Self(4);
    /// `CreateD3D9` / `RegisterD3D9Device` can only be called once
    pub const ALREADY_EXISTS: Self = Self(5);
    /// The registered device was not created through `CreateD3D9`
    pub const REGISTERING_NON_REMIX_D3D9_DEVICE: Self = Self(6);
    /// `RegisterD3D9Device` was never called
    pub const REMIX_DEVICE_WAS_NOT_REGISTERED: Self = Self(7);
    /// The requested interface version is not supported by the binary
    pub const INCOMPATIBLE_VERSION: Self = Self(8);
    /// `SetDllDirectory` failed
    pub const SET_DLL_DIRECTORY_FAILURE: Self = Self(9);
    /// `GetFullPathName` failed
    pub const GET_FULL_PATH_NAME_FAILURE: Self = Self(10);
    /// The renderer was used before `Startup`
    pub const NOT_INITIALIZED: Self = Self(11);
    /// The GPU lacks features the renderer requires
    pub const HRESULT_NO_REQUIRED_GPU_FEATURES: Self = Self(0x8896_0001_u32 as i32);
    /// The installed driver is too old
    pub const HRESULT_DRIVER_VERSION_BELOW_MINIMUM: Self = Self(0x8896_0002_u32 as i32);
    /// A DXVK instance extension could not be enabled
    pub const HRESULT_DXVK_INSTANCE_EXTENSION_FAIL: Self = Self(0x8896_0003_u32 as i32);
    /// `vkCreateInstance` failed
    pub const HRESULT_VK_CREATE_INSTANCE_FAIL: Self = Self(0x8896_0004_u32 as i32);
    /// `vkCreateDevice` failed
    pub const HRESULT_VK_CREATE_DEVICE_FAIL: Self = Self(0x8896_0005_u32 as i32);
    /// No queue family with graphics support was found
    pub const HRESULT_GRAPHICS_QUEUE_FAMILY_MISSING: Self = Self(0x8896_0006_u32 as i32);

    /// Whether this is the success sentinel
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Symbolic name of a known code
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "SUCCESS",
            Self::GENERAL_FAILURE => "GENERAL_FAILURE",
            Self::LOAD_LIBRARY_FAILURE => "LOAD_LIBRARY_FAILURE",
            Self::INVALID_ARGUMENTS => "INVALID_ARGUMENTS",
            Self::GET_PROC_ADDRESS_FAILURE => "GET_PROC_ADDRESS_FAILURE",
            Self::ALREADY_EXISTS => "ALREADY_EXISTS",
            Self::REGISTERING_NON_REMIX_D3D9_DEVICE => "REGISTERING_NON_REMIX_D3D9_DEVICE",
            Self::REMIX_DEVICE_WAS_NOT_REGISTERED => "REMIX_DEVICE_WAS_NOT_REGISTERED",
            Self::INCOMPATIBLE_VERSION => "INCOMPATIBLE_VERSION",
            Self::SET_DLL_DIRECTORY_FAILURE => "SET_DLL_DIRECTORY_FAILURE",
            Self::GET_FULL_PATH_NAME_FAILURE => "GET_FULL_PATH_NAME_FAILURE",
            Self::NOT_INITIALIZED => "NOT_INITIALIZED",
            Self::HRESULT_NO_REQUIRED_GPU_FEATURES => "HRESULT_NO_REQUIRED_GPU_FEATURES",
            Self::HRESULT_DRIVER_VERSION_BELOW_MINIMUM => "HRESULT_DRIVER_VERSION_BELOW_MINIMUM",
            Self::HRESULT_DXVK_INSTANCE_EXTENSION_FAIL => "HRESULT_DXVK_INSTANCE_EXTENSION_FAIL",
            Self::HRESULT_VK_CREATE_INSTANCE_FAIL => "HRESULT_VK_CREATE_INSTANCE_FAIL",
            Self::HRESULT_VK_CREATE_DEVICE_FAIL => "HRESULT_VK_CREATE_DEVICE_FAIL",
            Self::HRESULT_GRAPHICS_QUEUE_FAMILY_MISSING => "HRESULT_GRAPHICS_QUEUE_FAMILY_MISSING",
            _ => return None,
        };
        Some(name)
    }
}

impl From<i32> for ErrorCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "ErrorCode({})", self.0),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_names() {
        assert_eq!(ErrorCode::SUCCESS.name(), Some("SUCCESS"));
        assert_eq!(ErrorCode(7).name(), Some("REMIX_DEVICE_WAS_NOT_REGISTERED"));
        assert_eq!(
            ErrorCode::HRESULT_VK_CREATE_DEVICE_FAIL.name(),
            Some("HRESULT_VK_CREATE_DEVICE_FAIL")
        );
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let code = ErrorCode(4242);
        assert_eq!(code.name(), None);
        assert_eq!(code.to_string(), "4242");
        assert_eq!(format!("{code:?}"), "ErrorCode(4242)");
    }

    #[test]
    fn test_hresult_codes_keep_their_bit_pattern() {
        #[allow(clippy::cast_sign_loss)]
        let bits = ErrorCode::HRESULT_NO_REQUIRED_GPU_FEATURES.0 as u32;
        assert_eq!(bits, 0x8896_0001);
        assert!(!ErrorCode::HRESULT_NO_REQUIRED_GPU_FEATURES.is_success());
    }

    #[test]
    fn test_display_includes_name_and_value() {
        assert_eq!(ErrorCode::INVALID_ARGUMENTS.to_string(), "INVALID_ARGUMENTS (3)");
        assert!(ErrorCode::SUCCESS.is_success());
    }
}
