//! FFI bindings for Synheart Coach
//!
//! This module provides C-compatible functions for calling Coach from the
//! desktop shell. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `coach_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::adapter::{parse_activities, retain_valid};
use crate::engine::{recommendations_to_json, report_to_json, CoachProcessor};
use crate::features::productivity_score;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Negative seeds mean "draw from OS entropy"
fn seed_from_c(seed: i64) -> Option<u64> {
    u64::try_from(seed).ok()
}

// ============================================================================
// Stateless API
// ============================================================================

/// Generate recommendations from activity JSON.
///
/// `max_recommendations <= 0` uses the default of 3. A negative `seed` draws
/// from OS entropy.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `coach_free_string`.
/// - Returns NULL on error; call `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_recommendations(
    json: *const c_char,
    max_recommendations: i32,
    seed: i64,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let max = if max_recommendations <= 0 {
        crate::config::DEFAULT_MAX_RECOMMENDATIONS
    } else {
        max_recommendations as usize
    };

    match recommendations_to_json(&json_str, max, seed_from_c(seed)) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Compute the model-free productivity score (0-100) of activity JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a negative value on error; call `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_productivity_score(json: *const c_char) -> f64 {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1.0;
        }
    };

    match parse_activities(&json_str) {
        Ok(records) => productivity_score(&retain_valid(records)),
        Err(e) => {
            set_last_error(&e.to_string());
            -1.0
        }
    }
}

/// Encode a full coaching report from activity JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `coach_free_string`.
/// - Returns NULL on error; call `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_report(json: *const c_char, seed: i64) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match report_to_json(&json_str, seed_from_c(seed)) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a CoachProcessor
pub struct CoachProcessorHandle {
    processor: CoachProcessor,
}

/// Create a new CoachProcessor with default thresholds.
///
/// # Safety
/// - Returns a pointer to a newly allocated CoachProcessor.
/// - Must be freed with `coach_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_new() -> *mut CoachProcessorHandle {
    clear_last_error();

    let handle = Box::new(CoachProcessorHandle {
        processor: CoachProcessor::new(),
    });
    Box::into_raw(handle)
}

/// Free a CoachProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `coach_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_free(processor: *mut CoachProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Append a batch of activity JSON to the processor's log.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `coach_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns the number of records stored, or -1 on error; call
///   `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_ingest(
    processor: *mut CoachProcessorHandle,
    json: *const c_char,
) -> i64 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &*processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.ingest_json(&json_str) {
        Ok(stored) => stored as i64,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Recommendations over everything the processor has stored.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `coach_processor_new`.
/// - Returns a newly allocated string that must be freed with `coach_free_string`.
/// - Returns NULL on error; call `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_recommendations(
    processor: *mut CoachProcessorHandle,
    seed: i64,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let result = handle
        .processor
        .recommend(seed_from_c(seed))
        .and_then(|recs| serde_json::to_string(&recs).map_err(Into::into));

    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Full report over everything the processor has stored.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `coach_processor_new`.
/// - Returns a newly allocated string that must be freed with `coach_free_string`.
/// - Returns NULL on error; call `coach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_report(
    processor: *mut CoachProcessorHandle,
    seed: i64,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let result = handle
        .processor
        .report(seed_from_c(seed))
        .and_then(|report| serde_json::to_string(&report).map_err(Into::into));

    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Drop every record the processor has stored.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `coach_processor_new`.
/// - Returns 0 on success, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn coach_processor_reset(processor: *mut CoachProcessorHandle) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &*processor;

    match handle.processor.reset() {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Coach functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Coach function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn coach_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Coach function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn coach_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Coach library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn coach_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
