//! FFI String Passing
//!
//! Strings leave Rust only through callbacks: the host receives a pointer that
//! is valid for the duration of the call and must copy the content before
//! returning. Rust keeps ownership of every allocation, so nothing has to be
//! freed on the host side.
//!
//! The module also holds the last-error slot read by
//! `get_last_error_message` after a failing FFI call.

use std::ffi::{c_char, CString};
use std::sync::Mutex;

// ============================================================================
// String Callback Types
// ============================================================================

/// Callback receiving a NUL-terminated UTF-8 string.
///
/// # Safety Contract
/// - The pointer is only valid during the callback invocation
/// - The host must copy the string before the callback returns
pub type StringCallback = extern "C" fn(*const c_char);

/// Callback receiving a string together with its byte length.
pub type StringWithLenCallback = extern "C" fn(*const c_char, len: i32);

// ============================================================================
// Global Error Storage
// ============================================================================

static LAST_ERROR: Mutex<Option<String>> = Mutex::new(None);

/// Record the message of the most recent failure.
pub fn set_last_error_message(message: impl Into<String>) {
    if let Ok(mut guard) = LAST_ERROR.lock() {
        *guard = Some(message.into());
    }
}

pub fn clear_last_error() {
    if let Ok(mut guard) = LAST_ERROR.lock() {
        *guard = None;
    }
}

/// Last recorded error message (internal use).
pub fn get_last_error() -> Option<String> {
    LAST_ERROR.lock().ok().and_then(|guard| guard.clone())
}

// ============================================================================
// Safe String Passing Functions
// ============================================================================

/// Hand `s` to `callback` as a C string.
///
/// # Returns
/// * `true` if the callback was invoked
/// * `false` if `s` contains an interior NUL byte
pub fn with_string_callback(s: &str, callback: StringCallback) -> bool {
    match CString::new(s) {
        Ok(c_str) => {
            callback(c_str.as_ptr());
            true
        }
        Err(_) => false,
    }
}

/// Hand `s` to `callback` along with its byte length.
///
/// Strings with interior NUL bytes are passed as a raw NUL-terminated buffer
/// so the host can still read `len` bytes.
pub fn with_string_len_callback(s: &str, callback: StringWithLenCallback) -> bool {
    let len = s.len() as i32;
    match CString::new(s) {
        Ok(c_str) => callback(c_str.as_ptr(), len),
        Err(_) => {
            let mut buffer = s.as_bytes().to_vec();
            buffer.push(0);
            callback(buffer.as_ptr() as *const c_char, len);
        }
    }
    true
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Pass the last error message to `callback`.
///
/// # Returns
/// - 1 if an error message was available and passed to callback
/// - 0 if no error message was available
#[no_mangle]
pub extern "C" fn get_last_error_message(callback: StringCallback) -> i32 {
    match get_last_error() {
        Some(error) if with_string_callback(&error, callback) => 1,
        _ => 0,
    }
}

/// Pass the last error message and its length to `callback`.
///
/// # Returns
/// - 1 if an error message was available and passed to callback
/// - 0 if no error message was available
#[no_mangle]
pub extern "C" fn get_last_error_message_with_len(callback: StringWithLenCallback) -> i32 {
    match get_last_error() {
        Some(error) if with_string_len_callback(&error, callback) => 1,
        _ => 0,
    }
}

/// Clear the last error message before an FFI call.
#[no_mangle]
pub extern "C" fn clear_last_error_message() {
    clear_last_error();
}

/// 1 if an error message is pending, 0 otherwise.
#[no_mangle]
pub extern "C" fn has_error_message() -> i32 {
    i32::from(get_last_error().is_some())
}

// ============================================================================
// Tests
// ============================================================================
