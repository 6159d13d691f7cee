//! Album scan API.
//!
//! The async entry points return immediately; the callback fires exactly once
//! with a JSON array (empty when the scan failed). With queued callbacks the
//! host drains them via `kpicture_run_pending_callbacks` on its UI thread.

use crate::error::{clear_last_error, set_app_error, set_last_error};
use crate::handle::{KPictureHandle, ResultCallback, StoredCallback};
use crate::strings::write_json;
use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Scan and group albums asynchronously.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `user_data` must stay valid until the callback fires.
///
/// # Returns
/// - `0` if the scan was started
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn kpicture_scan_albums(
    handle: *mut KPictureHandle,
    callback: ResultCallback,
    user_data: *mut c_void,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let stored = StoredCallback::new(callback, user_data);
        handle
            .scanner
            .scan_albums_with_callback(handle.settings(), move |albums| stored.deliver(&albums));
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_scan_albums");
        -1
    })
}

/// List the records of one bucket asynchronously. Pass `-1` for all media.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `user_data` must stay valid until the callback fires.
#[no_mangle]
pub unsafe extern "C" fn kpicture_query_bucket(
    handle: *mut KPictureHandle,
    bucket_id: i64,
    callback: ResultCallback,
    user_data: *mut c_void,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let stored = StoredCallback::new(callback, user_data);
        handle.scanner.query_bucket_with_callback(
            handle.settings(),
            bucket_id,
            move |records| stored.deliver(&records),
        );
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_query_bucket");
        -1
    })
}

/// Scan and group albums, blocking the calling thread.
///
/// Unlike the async variant, failures are reported through the last error.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `out_json` receives a string that must be freed with `kpicture_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_scan_albums_json(
    handle: *mut KPictureHandle,
    out_json: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || out_json.is_null() {
            set_last_error("handle or out_json is null");
            return -1;
        }

        let handle = &*handle;
        let settings = handle.settings();
        match handle
            .runtime
            .block_on(handle.scanner.try_scan_albums(settings))
        {
            Ok(albums) => write_json(&albums, out_json),
            Err(e) => {
                set_app_error("scan albums", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_scan_albums_json");
        -1
    })
}

/// List the records of one bucket, blocking the calling thread.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `out_json` receives a string that must be freed with `kpicture_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_query_bucket_json(
    handle: *mut KPictureHandle,
    bucket_id: i64,
    out_json: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || out_json.is_null() {
            set_last_error("handle or out_json is null");
            return -1;
        }

        let handle = &*handle;
        let settings = handle.settings();
        match handle
            .runtime
            .block_on(handle.scanner.try_query_bucket(settings, bucket_id))
        {
            Ok(records) => write_json(&records, out_json),
            Err(e) => {
                set_app_error("query bucket", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_query_bucket_json");
        -1
    })
}

/// Run queued callbacks on the calling thread.
///
/// # Returns
/// - Number of callbacks run (always `0` when callbacks are delivered inline)
/// - `-1` on error
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_run_pending_callbacks(handle: *mut KPictureHandle) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let mut queue = handle.queue.lock();
        match queue.as_mut() {
            Some(queue) => i32::try_from(queue.run_pending()).unwrap_or(i32::MAX),
            None => 0,
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_run_pending_callbacks");
        -1
    })
}
