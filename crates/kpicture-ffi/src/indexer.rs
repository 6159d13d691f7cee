//! Index API - directory indexing into the media index.

use crate::error::{clear_last_error, set_app_error, set_last_error};
use crate::handle::{KPictureHandle, ResultCallback, StoredCallback};
use crate::strings::{cstr_to_str, write_json};
use kpicture_lib::services::{IndexOptions, IndexResult, MediaIndexer};
use kpicture_lib::CommandError;
use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

unsafe fn parse_path(path_utf8: *const c_char) -> Option<PathBuf> {
    let Some(path_str) = cstr_to_str(path_utf8) else {
        set_last_error("path is null or not valid UTF-8");
        return None;
    };
    let path = PathBuf::from(path_str);
    if !path.is_dir() {
        set_last_error(format!("E_PATH_INVALID: not a directory: {}", path_str));
        return None;
    }
    Some(path)
}

/// Index a directory, blocking the calling thread.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `path_utf8` must be a NUL-terminated UTF-8 string.
/// - `out_json` receives an `IndexResult` JSON string; free it with
///   `kpicture_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_index_directory(
    handle: *mut KPictureHandle,
    path_utf8: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || out_json.is_null() {
            set_last_error("handle or out_json is null");
            return -1;
        }

        let handle = &*handle;
        let Some(path) = parse_path(path_utf8) else {
            return -1;
        };

        let indexer = MediaIndexer::new(handle.database.clone(), IndexOptions::default());
        match indexer.index_directory(&path) {
            Ok(index_result) => write_json(&index_result, out_json),
            Err(e) => {
                set_app_error("index directory", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_index_directory");
        -1
    })
}

/// Index result or error delivered to the async callback.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum IndexOutcome {
    Finished(IndexResult),
    Failed { error: CommandError },
}

/// Index a directory on the blocking pool; `callback` receives either an
/// `IndexResult` object or `{"error": {"code", "message"}}`.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `path_utf8` must be a NUL-terminated UTF-8 string.
/// - `user_data` must stay valid until the callback fires.
#[no_mangle]
pub unsafe extern "C" fn kpicture_index_directory_async(
    handle: *mut KPictureHandle,
    path_utf8: *const c_char,
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
        let Some(path) = parse_path(path_utf8) else {
            return -1;
        };

        let db = handle.database.clone();
        let stored = StoredCallback::new(callback, user_data);
        handle.runtime.spawn_blocking(move || {
            let indexer = MediaIndexer::new(db, IndexOptions::default());
            let outcome = match indexer.index_directory(&path) {
                Ok(index_result) => IndexOutcome::Finished(index_result),
                Err(e) => {
                    tracing::error!("Indexing failed: {}", e);
                    IndexOutcome::Failed { error: e.into() }
                }
            };
            stored.deliver(&outcome);
        });
        0
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_index_directory_async");
        -1
    })
}

/// Get media index statistics as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `out_json` receives a string that must be freed with `kpicture_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_get_stats_json(
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
        match handle.database.stats() {
            Ok(stats) => write_json(&stats, out_json),
            Err(e) => {
                set_app_error("get stats", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_get_stats_json");
        -1
    })
}
