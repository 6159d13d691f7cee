//! C string helpers.

use std::ffi::{c_char, CStr, CString};

/// Convert a C string to `&str`. Returns `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned reference.
pub unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Allocate a C string; free it with `kpicture_free_string()`.
pub fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Serialize `value` and store it in `out_json`.
///
/// # Safety
/// `out_json` must be a valid, non-null pointer.
pub unsafe fn write_json<T: serde::Serialize>(value: &T, out_json: *mut *mut c_char) -> i32 {
    match serde_json::to_string(value) {
        Ok(json) => {
            *out_json = string_to_cstr(&json);
            0
        }
        Err(e) => {
            crate::error::set_app_error("serialize result", e.into());
            -1
        }
    }
}
