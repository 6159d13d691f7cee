//! KPicture FFI - C ABI interface for native hosts.
//!
//! This crate exposes the kpicture engine to non-Rust frontends.
//!
//! # Usage
//!
//! 1. Call `kpicture_init()` to create a handle
//! 2. Optionally index directories with `kpicture_index_directory()`
//! 3. Scan albums with `kpicture_scan_albums()`; open one with `kpicture_query_bucket()`
//! 4. Call `kpicture_shutdown()` to clean up
//!
//! # Error Handling
//!
//! Most functions return `0` on success, `-1` on error.
//! Call `kpicture_last_error()` to get the error message, prefixed with a
//! stable code such as `E_INVALID_ARGUMENT`.
//!
//! # Memory Management
//!
//! - Strings returned via `out_json` must be freed with `kpicture_free_string()`
//! - JSON passed to callbacks is only valid during the callback
//! - The handle must be freed with `kpicture_shutdown()`

mod albums;
mod error;
mod handle;
mod indexer;
mod settings;
mod strings;

use error::{clear_last_error, get_last_error_ptr, set_app_error, set_last_error};
use handle::{HandleOptions, KPictureHandle};
use std::ffi::{c_char, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use strings::cstr_to_str;

// Re-export all public FFI functions
pub use albums::*;
pub use indexer::*;
pub use settings::*;

/// Initialize the KPicture library.
///
/// # Parameters
/// - `db_path_utf8`: media index path, or `NULL` for the platform data directory
/// - `settings_dir_utf8`: settings directory, or `NULL` for the platform data directory
/// - `queued_callbacks`: when `true`, callbacks wait for `kpicture_run_pending_callbacks()`
///
/// # Returns
/// - Valid handle pointer on success
/// - `NULL` on error (call `kpicture_last_error()` for details)
///
/// # Safety
/// Non-null string arguments must be NUL-terminated UTF-8.
/// The returned handle must be freed with `kpicture_shutdown()`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_init(
    db_path_utf8: *const c_char,
    settings_dir_utf8: *const c_char,
    queued_callbacks: bool,
) -> *mut KPictureHandle {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        kpicture_lib::init_tracing();

        let options = HandleOptions {
            db_path: cstr_to_str(db_path_utf8).map(PathBuf::from),
            settings_dir: cstr_to_str(settings_dir_utf8).map(PathBuf::from),
            queued_callbacks,
        };

        match KPictureHandle::new(options) {
            Ok(handle) => {
                tracing::info!("KPicture FFI initialized");
                Box::into_raw(Box::new(handle))
            }
            Err(e) => {
                set_app_error("initialization", e);
                std::ptr::null_mut()
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic during initialization");
        std::ptr::null_mut()
    })
}

/// Shutdown the KPicture library and free resources.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init()`
/// - After calling this function, the handle is invalid
#[no_mangle]
pub unsafe extern "C" fn kpicture_shutdown(handle: *mut KPictureHandle) {
    clear_last_error();

    if handle.is_null() {
        return;
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        let handle = Box::from_raw(handle);
        handle.runtime.shutdown_background();
        tracing::info!("KPicture FFI shutdown");
    }));

    if result.is_err() {
        set_last_error("panic during shutdown");
    }
}

/// Get the last error message.
///
/// # Returns
/// - Pointer to error message (valid until next FFI call on this thread)
/// - `NULL` if no error
#[no_mangle]
pub extern "C" fn kpicture_last_error() -> *const c_char {
    get_last_error_ptr()
}

/// Free a string allocated by the library.
///
/// # Safety
/// - `s` must be a pointer returned by a kpicture function
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn kpicture_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Get the library version.
///
/// # Returns
/// - Version string (must be freed with `kpicture_free_string()`)
#[no_mangle]
pub extern "C" fn kpicture_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}
