//! FFI bindings for Kaltrack
//!
//! This module provides C-compatible functions for calling Kaltrack from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `kaltrack_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::packet::PacketDecoder;
use crate::pipeline::{process_packet, SummaryProcessor};
use crate::summary::SummaryEncoder;

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

/// Process a JSON array of workout packets and return a workout.summary.v1
/// payload as JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `kaltrack_free_string`.
/// - Returns NULL on error; call `kaltrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn kaltrack_process_packets_json(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let packets = match PacketDecoder::parse_array(&json_str) {
        Ok(packets) => packets,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let mut processor = SummaryProcessor::new();
    let mut summaries = Vec::with_capacity(packets.len());

    for packet in &packets {
        match processor.process(packet) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    }

    let encoder = SummaryEncoder::new();
    match encoder.encode_to_json(&summaries) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Render the summary line for one packet given its tag and parameter array.
///
/// # Safety
/// - `tag` must be a valid null-terminated C string.
/// - `data` must point to `len` readable f64 values (may be NULL when `len` is 0).
/// - Returns a newly allocated string that must be freed with `kaltrack_free_string`.
/// - Returns NULL on error; call `kaltrack_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn kaltrack_render_packet(
    tag: *const c_char,
    data: *const f64,
    len: usize,
) -> *mut c_char {
    clear_last_error();

    let tag_str = match cstr_to_string(tag) {
        Some(s) => s,
        None => {
            set_last_error("Invalid tag string pointer");
            return ptr::null_mut();
        }
    };

    if data.is_null() && len != 0 {
        set_last_error("Null data pointer with non-zero length");
        return ptr::null_mut();
    }

    let values: &[f64] = if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(data, len)
    };

    match process_packet(&tag_str, values) {
        Ok(summary) => string_to_cstr(&summary.render()),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the last error message for the calling thread.
///
/// # Safety
/// - The returned pointer is owned by Kaltrack and valid until the next
///   Kaltrack call on this thread; do NOT free it.
/// - Returns NULL if there is no pending error.
#[no_mangle]
pub unsafe extern "C" fn kaltrack_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map_or(ptr::null(), |cstr| cstr.as_ptr())
    })
}

/// Free a string allocated by Kaltrack.
///
/// # Safety
/// - `s` must be a pointer returned by a Kaltrack function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn kaltrack_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        kaltrack_free_string(ptr);
        s
    }

    #[test]
    fn test_render_packet_ffi() {
        let tag = CString::new("RUN").unwrap();
        let data = [15000.0, 1.0, 75.0];

        let line = unsafe {
            take_string(kaltrack_render_packet(tag.as_ptr(), data.as_ptr(), data.len()))
        };

        assert!(line.starts_with("Тип тренировки: Running"));
        assert!(line.contains("797.805"));
    }

    #[test]
    fn test_render_packet_ffi_error() {
        let tag = CString::new("XYZ").unwrap();
        let data = [1.0, 1.0, 1.0];

        unsafe {
            let result = kaltrack_render_packet(tag.as_ptr(), data.as_ptr(), data.len());
            assert!(result.is_null());

            let err = kaltrack_last_error();
            assert!(!err.is_null());
            let msg = CStr::from_ptr(err).to_str().unwrap();
            assert!(msg.contains("XYZ"));
        }
    }

    #[test]
    fn test_process_packets_json_ffi() {
        let json = CString::new(
            r#"[
                {"workout_type": "SWM", "data": [720, 1, 80, 25, 40]},
                {"workout_type": "RUN", "data": [15000, 1, 75]}
            ]"#,
        )
        .unwrap();

        let payload = unsafe { take_string(kaltrack_process_packets_json(json.as_ptr())) };
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(parsed["schema_version"], "workout.summary.v1");
        assert_eq!(parsed["totals"]["sessions"], 2);
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            assert!(kaltrack_process_packets_json(ptr::null()).is_null());
            assert!(!kaltrack_last_error().is_null());
        }
    }
}
