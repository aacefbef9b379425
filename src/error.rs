//! Error Handling Module
//!
//! Provides structured error types for property containers and tables.
//! Uses `thiserror` for ergonomic error definitions and implements
//! conversion to FFI error codes.
//!
//! Lookups that answer "is it there?" (`has`, `has_table`, `erase`) never
//! fail. Only value retrieval and collection bookkeeping produce errors.

use thiserror::Error;

use crate::ffi::{
    ERR_DUPLICATE_ID, ERR_EMPTY_TABLE, ERR_INTERNAL_PANIC, ERR_INVALID_PARAM,
    ERR_KEY_NOT_FOUND, ERR_NULL_POINTER, ERR_PROPERTIES_NOT_FOUND, ERR_TABLE_NOT_FOUND,
    ERR_UNKNOWN_KEY,
};
use crate::ffi_string::set_last_error_message;

// ============================================================================
// Error Types
// ============================================================================

/// Main error type for property containers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertiesError {
    // Lookup Errors
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("No table registered for input {input} and output {output}")]
    TableNotFound { input: String, output: String },

    #[error("Table has no rows")]
    EmptyTable,

    #[error("Unknown property key: {0}")]
    UnknownKey(String),

    // Collection Errors
    #[error("Properties with id {id} already exist")]
    DuplicateId { id: u32 },

    #[error("Properties with id {id} not found")]
    PropertiesNotFound { id: u32 },

    #[error("Sub-properties with id {id} not found")]
    SubPropertiesNotFound { id: u32 },

    // Parameter Errors
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Null pointer passed for parameter: {name}")]
    NullPointer { name: String },

    // Internal Errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

// ============================================================================
// Error Code Conversion
// ============================================================================

impl PropertiesError {
    /// Convert error to FFI error code.
    pub fn to_error_code(&self) -> i32 {
        match self {
            PropertiesError::KeyNotFound { .. } => ERR_KEY_NOT_FOUND,
            PropertiesError::TableNotFound { .. } => ERR_TABLE_NOT_FOUND,
            PropertiesError::EmptyTable => ERR_EMPTY_TABLE,
            PropertiesError::UnknownKey(_) => ERR_UNKNOWN_KEY,
            PropertiesError::DuplicateId { .. } => ERR_DUPLICATE_ID,
            PropertiesError::PropertiesNotFound { .. } => ERR_PROPERTIES_NOT_FOUND,
            PropertiesError::SubPropertiesNotFound { .. } => ERR_PROPERTIES_NOT_FOUND,
            PropertiesError::InvalidParameter { .. } => ERR_INVALID_PARAM,
            PropertiesError::NullPointer { .. } => ERR_NULL_POINTER,
            PropertiesError::InternalError(_) => ERR_INTERNAL_PANIC,
        }
    }

    /// Set this error as the last error and return the error code.
    pub fn set_and_return_code(&self) -> i32 {
        set_last_error(self);
        self.to_error_code()
    }
}

// ============================================================================
// Global Error Storage
// ============================================================================

/// Store the error message so it can be retrieved via FFI.
pub fn set_last_error(error: &PropertiesError) {
    set_last_error_message(error.to_string());
}

/// Result alias used throughout the crate.
pub type PropertiesResult<T> = Result<T, PropertiesError>;

// ============================================================================
// Error Construction Helpers
// ============================================================================

impl PropertiesError {
    pub fn key_not_found(key: impl Into<String>) -> Self {
        PropertiesError::KeyNotFound { key: key.into() }
    }

    pub fn table_not_found(input: impl Into<String>, output: impl Into<String>) -> Self {
        PropertiesError::TableNotFound {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn unknown_key(name: impl Into<String>) -> Self {
        PropertiesError::UnknownKey(name.into())
    }

    pub fn duplicate_id(id: u32) -> Self {
        PropertiesError::DuplicateId { id }
    }

    pub fn properties_not_found(id: u32) -> Self {
        PropertiesError::PropertiesNotFound { id }
    }

    pub fn sub_properties_not_found(id: u32) -> Self {
        PropertiesError::SubPropertiesNotFound { id }
    }

    pub fn invalid_param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PropertiesError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn null_pointer(name: impl Into<String>) -> Self {
        PropertiesError::NullPointer { name: name.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PropertiesError::InternalError(message.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
