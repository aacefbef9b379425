//! FFI (Foreign Function Interface) layer.
//!
//! All functions use `extern "C"` ABI and `#[no_mangle]` so a host language
//! can drive property containers through a plain C interface. Keys cross the
//! boundary as numeric key ids (`PropertyKey::id`). Error handling uses return
//! codes instead of panics; the message of the last failure is available via
//! `get_last_error_message`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{PropertiesError, PropertiesResult};
use crate::ffi_string::{with_string_callback, StringCallback};
use crate::keys::PropertyKey;
use crate::logger::{self, LogCallback, Logger};
use crate::properties::Properties;
use crate::table::PiecewiseLinearTable;
use crate::types::{LookupConfig, TableRow};
use crate::utilities::PropertiesUtilities;

// ============================================================================
// Error Codes
// ============================================================================

/// Operation completed successfully
pub const ERR_SUCCESS: i32 = 0;
/// Null pointer was passed to function
pub const ERR_NULL_POINTER: i32 = -1;
/// Invalid parameter value
pub const ERR_INVALID_PARAM: i32 = -2;
/// No value stored for the key
pub const ERR_KEY_NOT_FOUND: i32 = -3;
/// No table registered for the key pair
pub const ERR_TABLE_NOT_FOUND: i32 = -4;
/// Table lookup on a table without rows
pub const ERR_EMPTY_TABLE: i32 = -5;
/// Key id or name not in the registry
pub const ERR_UNKNOWN_KEY: i32 = -6;
/// Properties id already in use
pub const ERR_DUPLICATE_ID: i32 = -7;
/// Properties or sub-properties id not found
pub const ERR_PROPERTIES_NOT_FOUND: i32 = -8;
/// Internal panic (should not happen)
pub const ERR_INTERNAL_PANIC: i32 = -99;

// ============================================================================
// Properties Handle
// ============================================================================

/// Opaque handle owning a `Properties` container.
pub struct PropertiesHandle {
    pub properties: Properties,
    logger: Logger,
}

impl PropertiesHandle {
    fn new(properties: Properties) -> Self {
        Self {
            properties,
            logger: Logger::default(),
        }
    }
}

/// Run `f` on a valid handle, translating errors and panics to codes.
unsafe fn with_handle<F>(handle: *mut PropertiesHandle, f: F) -> i32
where
    F: FnOnce(&mut PropertiesHandle) -> PropertiesResult<i32>,
{
    if handle.is_null() {
        return PropertiesError::null_pointer("handle").set_and_return_code();
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees handle came from create_properties
        let handle = &mut *handle;
        f(handle)
    }));

    match result {
        Ok(Ok(code)) => code,
        Ok(Err(err)) => err.set_and_return_code(),
        Err(_) => PropertiesError::internal("panic in FFI call").set_and_return_code(),
    }
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Create an empty property container.
///
/// # Safety
/// - `config` must be a valid pointer to LookupConfig or null (uses defaults)
/// - Caller must call `free_properties` to release the returned pointer
///
/// # Returns
/// - Valid handle on success
/// - Null pointer on failure
#[no_mangle]
pub unsafe extern "C" fn create_properties(
    id: u32,
    config: *const LookupConfig,
) -> *mut PropertiesHandle {
    let result = catch_unwind(|| {
        let lookup = if config.is_null() {
            LookupConfig::default()
        } else {
            // SAFETY: Caller guarantees config is valid
            *config
        };

        let handle = PropertiesHandle::new(Properties::with_config(id, lookup));
        handle.logger.log_properties_created(id);
        Box::into_raw(Box::new(handle))
    });

    result.unwrap_or(std::ptr::null_mut())
}

/// Deep-copy a container into a new, independent handle.
///
/// # Safety
/// - `handle` must be a valid pointer from `create_properties` or null
/// - Caller must call `free_properties` on the returned pointer
///
/// # Returns
/// - Valid handle on success
/// - Null pointer if `handle` is null or on failure
#[no_mangle]
pub unsafe extern "C" fn clone_properties(handle: *const PropertiesHandle) -> *mut PropertiesHandle {
    if handle.is_null() {
        PropertiesError::null_pointer("handle").set_and_return_code();
        return std::ptr::null_mut();
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: validated above
        let source = &*handle;
        let copy = PropertiesHandle::new(Properties::from(&source.properties));
        copy.logger.log_properties_cloned(copy.properties.id());
        Box::into_raw(Box::new(copy))
    }));

    result.unwrap_or(std::ptr::null_mut())
}

/// Free a container handle.
///
/// # Safety
/// - `handle` must be a valid pointer from `create_properties`/`clone_properties`
/// - Must only be called once per handle
#[no_mangle]
pub unsafe extern "C" fn free_properties(handle: *mut PropertiesHandle) {
    if handle.is_null() {
        return;
    }

    let _ = catch_unwind(|| {
        // SAFETY: caller guarantees handle is valid and freed only once
        drop(Box::from_raw(handle));
    });
}

/// Store `value` for the key with id `key_id`.
///
/// # Safety
/// - `handle` must be a valid handle or null
///
/// # Returns
/// - ERR_SUCCESS on success
/// - ERR_NULL_POINTER if handle is null
/// - ERR_UNKNOWN_KEY if `key_id` is not registered
#[no_mangle]
pub unsafe extern "C" fn properties_set_value(
    handle: *mut PropertiesHandle,
    key_id: u32,
    value: f64,
) -> i32 {
    with_handle(handle, |h| {
        let key = PropertyKey::from_id(key_id)?;
        h.properties.set_value(key, value);
        h.logger.log_value_set(h.properties.id(), key.name(), value);
        Ok(ERR_SUCCESS)
    })
}

/// Read the value stored for `key_id` into `out`.
///
/// # Safety
/// - `handle` must be a valid handle or null
/// - `out` must be a valid pointer to write an f64
///
/// # Returns
/// - ERR_SUCCESS on success
/// - ERR_NULL_POINTER if handle or out is null
/// - ERR_UNKNOWN_KEY / ERR_KEY_NOT_FOUND on lookup failure
#[no_mangle]
pub unsafe extern "C" fn properties_get_value(
    handle: *mut PropertiesHandle,
    key_id: u32,
    out: *mut f64,
) -> i32 {
    if out.is_null() {
        return PropertiesError::null_pointer("out").set_and_return_code();
    }
    with_handle(handle, |h| {
        let key = PropertyKey::from_id(key_id)?;
        let value = h.properties.get_value(key).map_err(|err| {
            h.logger.log_lookup_failed(h.properties.id(), &err.to_string());
            err
        })?;
        // SAFETY: validated above
        *out = value;
        Ok(ERR_SUCCESS)
    })
}

/// 1 if a value is stored for `key_id`, 0 if not, negative on error.
///
/// # Safety
/// - `handle` must be a valid handle or null
#[no_mangle]
pub unsafe extern "C" fn properties_has(handle: *mut PropertiesHandle, key_id: u32) -> i32 {
    with_handle(handle, |h| {
        let key = PropertyKey::from_id(key_id)?;
        Ok(i32::from(h.properties.has(key)))
    })
}

/// Remove the value stored for `key_id`, if any.
///
/// # Safety
/// - `handle` must be a valid handle or null
#[no_mangle]
pub unsafe extern "C" fn properties_erase(handle: *mut PropertiesHandle, key_id: u32) -> i32 {
    with_handle(handle, |h| {
        let key = PropertyKey::from_id(key_id)?;
        h.properties.erase(key);
        Ok(ERR_SUCCESS)
    })
}

/// Register a table built from `len` rows under `(input_id, output_id)`.
///
/// Rows are copied in order; the caller keeps ownership of the array.
///
/// # Safety
/// - `handle` must be a valid handle or null
/// - `rows` must point to `len` TableRow values, or be null when `len` is 0
///
/// # Returns
/// - ERR_SUCCESS on success
/// - ERR_NULL_POINTER if handle is null, or rows is null with len > 0
/// - ERR_INVALID_PARAM if any row is not finite
/// - ERR_UNKNOWN_KEY if a key id is not registered
#[no_mangle]
pub unsafe extern "C" fn properties_set_table(
    handle: *mut PropertiesHandle,
    input_id: u32,
    output_id: u32,
    rows: *const TableRow,
    len: usize,
) -> i32 {
    if rows.is_null() && len > 0 {
        return PropertiesError::null_pointer("rows").set_and_return_code();
    }
    with_handle(handle, |h| {
        let input = PropertyKey::from_id(input_id)?;
        let output = PropertyKey::from_id(output_id)?;

        let slice: &[TableRow] = if len == 0 {
            &[]
        } else {
            // SAFETY: caller guarantees rows points to len elements
            std::slice::from_raw_parts(rows, len)
        };
        if let Some(pos) = slice.iter().position(|r| !r.is_finite()) {
            return Err(PropertiesError::invalid_param(
                "rows",
                format!("row {} is not finite", pos),
            ));
        }

        h.properties
            .set_table(input, output, PiecewiseLinearTable::from_rows(slice.iter().copied()));
        h.logger
            .log_table_set(h.properties.id(), input.name(), output.name(), len);
        Ok(ERR_SUCCESS)
    })
}

/// 1 if a table exists for exactly `(input_id, output_id)`, 0 if not,
/// negative on error.
///
/// # Safety
/// - `handle` must be a valid handle or null
#[no_mangle]
pub unsafe extern "C" fn properties_has_table(
    handle: *mut PropertiesHandle,
    input_id: u32,
    output_id: u32,
) -> i32 {
    with_handle(handle, |h| {
        let input = PropertyKey::from_id(input_id)?;
        let output = PropertyKey::from_id(output_id)?;
        Ok(i32::from(h.properties.has_table(input, output)))
    })
}

/// Evaluate the `(input_id, output_id)` table at `x` into `out`.
///
/// # Safety
/// - `handle` must be a valid handle or null
/// - `out` must be a valid pointer to write an f64
#[no_mangle]
pub unsafe extern "C" fn properties_table_value(
    handle: *mut PropertiesHandle,
    input_id: u32,
    output_id: u32,
    x: f64,
    out: *mut f64,
) -> i32 {
    if out.is_null() {
        return PropertiesError::null_pointer("out").set_and_return_code();
    }
    with_handle(handle, |h| {
        let input = PropertyKey::from_id(input_id)?;
        let output = PropertyKey::from_id(output_id)?;
        let value = h.properties.get_value_from_table(input, output, x)?;
        // SAFETY: validated above
        *out = value;
        Ok(ERR_SUCCESS)
    })
}

/// Copy the scalar values of `source` into `destination`.
///
/// # Safety
/// - Both pointers must be valid handles or null, and must not be the same handle
#[no_mangle]
pub unsafe extern "C" fn properties_copy_values(
    source: *const PropertiesHandle,
    destination: *mut PropertiesHandle,
) -> i32 {
    if source.is_null() {
        return PropertiesError::null_pointer("source").set_and_return_code();
    }
    if std::ptr::eq(source, destination) {
        return ERR_SUCCESS;
    }
    with_handle(destination, |dst| {
        // SAFETY: validated above, distinct from destination
        let src = &*source;
        PropertiesUtilities::copy_properties_values(&src.properties, &mut dst.properties);
        dst.logger.log_values_copied(
            src.properties.id(),
            dst.properties.id(),
            src.properties.number_of_values(),
        );
        Ok(ERR_SUCCESS)
    })
}

/// Pass the textual rendering of the container to `callback`.
///
/// # Safety
/// - `handle` must be a valid handle or null
/// - The callback must copy the string before returning
///
/// # Returns
/// - ERR_SUCCESS on success
/// - ERR_NULL_POINTER if handle or callback is null
#[no_mangle]
pub unsafe extern "C" fn properties_print(
    handle: *mut PropertiesHandle,
    callback: Option<StringCallback>,
) -> i32 {
    let Some(callback) = callback else {
        return PropertiesError::null_pointer("callback").set_and_return_code();
    };
    with_handle(handle, |h| {
        if with_string_callback(&h.properties.to_string(), callback) {
            Ok(ERR_SUCCESS)
        } else {
            Err(PropertiesError::internal("rendering contains a NUL byte"))
        }
    })
}

/// Install the host log callback.
///
/// # Returns
/// - ERR_SUCCESS on success
/// - ERR_NULL_POINTER if callback is null
#[no_mangle]
pub extern "C" fn set_log_callback(callback: Option<LogCallback>) -> i32 {
    match callback {
        Some(cb) => {
            logger::set_log_callback(cb);
            ERR_SUCCESS
        }
        None => ERR_NULL_POINTER,
    }
}
