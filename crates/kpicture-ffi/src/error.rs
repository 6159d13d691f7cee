//! Thread-local error handling for FFI.
//!
//! Uses the "last error" pattern common in C APIs. Engine errors are stored
//! as `"<code>: <message>"` so hosts can branch on the stable code prefix.

use kpicture_lib::{AppError, CommandError};
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message for the current thread.
pub fn set_last_error(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::error!("FFI error: {}", msg);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Record an engine error with its stable code.
pub fn set_app_error(context: &str, err: AppError) {
    let command_error = CommandError::from(err);
    set_last_error(format!(
        "{}: {} failed: {}",
        command_error.code, context, command_error.message
    ));
}

/// Clear the last error for the current thread.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Get a pointer to the last error message.
/// Returns null if no error is set.
/// The pointer is valid until the next FFI call on this thread.
pub fn get_last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(std::ptr::null())
    })
}

/// Copy of the last error, for tests.
#[cfg(test)]
pub fn last_error_string() -> Option<String> {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.to_string_lossy().into_owned())
    })
}
