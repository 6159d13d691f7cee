//! Settings API.

use crate::error::{clear_last_error, set_app_error, set_last_error};
use crate::handle::KPictureHandle;
use crate::strings::{cstr_to_str, write_json};
use kpicture_lib::{AppResult, FilterConfigurationBuilder, PickerSettings};
use std::ffi::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Get current settings as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `out_json` receives a string that must be freed with `kpicture_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_get_settings_json(
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
        write_json(&handle.settings(), out_json)
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_get_settings_json");
        -1
    })
}

/// Replace settings from JSON and persist them. Missing keys take defaults.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `settings_json` must be a NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn kpicture_save_settings_json(
    handle: *mut KPictureHandle,
    settings_json: *const c_char,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() || settings_json.is_null() {
            set_last_error("handle or settings_json is null");
            return -1;
        }

        let handle = &*handle;

        let Some(json_str) = cstr_to_str(settings_json) else {
            set_last_error("invalid UTF-8 in settings_json");
            return -1;
        };

        let settings: PickerSettings = match serde_json::from_str(json_str) {
            Ok(s) => s,
            Err(e) => {
                set_app_error("parse settings", e.into());
                return -1;
            }
        };

        match handle.update_settings(settings) {
            Ok(()) => 0,
            Err(e) => {
                set_app_error("save settings", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_save_settings_json");
        -1
    })
}

/// Reset settings to defaults.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
#[no_mangle]
pub unsafe extern "C" fn kpicture_reset_settings(handle: *mut KPictureHandle) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        match handle.update_settings(PickerSettings::default()) {
            Ok(()) => 0,
            Err(e) => {
                set_app_error("reset settings", e);
                -1
            }
        }
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_reset_settings");
        -1
    })
}

/// Apply a bound update through the filter builder and persist the result.
fn update_filter<F>(handle: &KPictureHandle, context: &str, update: F) -> i32
where
    F: FnOnce(FilterConfigurationBuilder) -> AppResult<FilterConfigurationBuilder>,
{
    let mut settings = handle.settings();
    let outcome = update(settings.filter.to_builder()).and_then(|builder| {
        settings.filter = builder.build();
        handle.update_settings(settings)
    });

    match outcome {
        Ok(()) => 0,
        Err(e) => {
            set_app_error(context, e);
            -1
        }
    }
}

/// Set the file size bounds in bytes (`max == 0` means unbounded).
///
/// Both pointers are required; a null pointer is rejected with
/// `E_INVALID_ARGUMENT` and leaves the settings untouched.
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `min` and `max` must be null or point to readable `u64` values.
#[no_mangle]
pub unsafe extern "C" fn kpicture_filter_set_size_bounds(
    handle: *mut KPictureHandle,
    min: *const u64,
    max: *const u64,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let (min, max) = (min.as_ref().copied(), max.as_ref().copied());
        update_filter(handle, "set size bounds", |builder| {
            builder.file_min_size(min)?.file_max_size(max)
        })
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_filter_set_size_bounds");
        -1
    })
}

/// Set the video duration bounds in milliseconds (`max == 0` means unbounded).
///
/// # Safety
/// - `handle` must be a valid pointer from `kpicture_init`.
/// - `min` and `max` must be null or point to readable `u64` values.
#[no_mangle]
pub unsafe extern "C" fn kpicture_filter_set_duration_bounds(
    handle: *mut KPictureHandle,
    min: *const u64,
    max: *const u64,
) -> i32 {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            set_last_error("handle is null");
            return -1;
        }

        let handle = &*handle;
        let (min, max) = (min.as_ref().copied(), max.as_ref().copied());
        update_filter(handle, "set duration bounds", |builder| {
            builder.duration_min(min)?.duration_max(max)
        })
    }));

    result.unwrap_or_else(|_| {
        set_last_error("panic in kpicture_filter_set_duration_bounds");
        -1
    })
}
