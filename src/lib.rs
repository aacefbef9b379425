//! MatProp Core
//!
//! Material property containers for finite-element models: scalar values
//! keyed by registered attribute keys, piecewise-linear lookup tables keyed by
//! `(input, output)` key pairs, and a C interface for host-language bindings.

pub mod types;
pub mod error;
pub mod keys;
pub mod table;
pub mod properties;
pub mod utilities;
pub mod model_part;
pub mod logger;
pub mod ffi;
pub mod ffi_string;

pub use types::*;
pub use error::{PropertiesError, PropertiesResult};
pub use keys::*;
pub use table::*;
pub use properties::*;
pub use utilities::*;
pub use model_part::*;
pub use ffi::*;
// Note: logger::set_log_callback is intentionally not re-exported here
// to avoid conflict with ffi::set_log_callback. Use ffi::set_log_callback for FFI.
pub use logger::{Logger, LogLevel, LogCallback, clear_log_callback};
