//! Structured logging module.
//!
//! Provides leveled logging with correlation IDs and a host callback. The
//! callback is held in an `AtomicPtr`, so setting, clearing and logging never
//! take a lock. When no callback is installed, global log calls are dropped.

use std::ffi::CString;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

/// Log levels matching common logging conventions.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Convert from i32 for FFI.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Trace),
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Warn),
            4 => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Log callback function type for FFI.
pub type LogCallback = extern "C" fn(level: i32, message: *const std::ffi::c_char);

/// Either null or a valid `LogCallback` cast to a data pointer.
static LOG_CALLBACK: AtomicPtr<()> = AtomicPtr::new(std::ptr::null_mut());

static CORRELATION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn dispatch(level: LogLevel, message: &str) {
    let ptr = LOG_CALLBACK.load(Ordering::SeqCst);
    if ptr.is_null() {
        return;
    }

    // SAFETY: only valid function pointers are stored in LOG_CALLBACK
    let callback: LogCallback = unsafe { std::mem::transmute(ptr) };
    if let Ok(c_string) = CString::new(message) {
        callback(level as i32, c_string.as_ptr());
    }
}

/// Structured logger with correlation ID support.
#[derive(Debug)]
pub struct Logger {
    min_level: LogLevel,
    /// 0 means no correlation
    correlation_id: u64,
    name: String,
}

impl Logger {
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Info,
            correlation_id: 0,
            name: name.to_string(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_correlation_id(mut self, id: u64) -> Self {
        self.correlation_id = id;
        self
    }

    /// Generate a new process-wide correlation ID.
    pub fn new_correlation_id() -> u64 {
        CORRELATION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
    }

    /// Set a new correlation ID and return it.
    pub fn start_correlation(&mut self) -> u64 {
        self.correlation_id = Self::new_correlation_id();
        self.correlation_id
    }

    pub fn correlation_id(&self) -> u64 {
        self.correlation_id
    }

    /// Log a message at the given level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        if !has_log_callback() && !cfg!(all(debug_assertions, feature = "stderr-log")) {
            return;
        }

        let formatted = if self.correlation_id > 0 {
            format!(
                "[{}] [{}] [cid:{}] {}",
                level.as_str(),
                self.name,
                self.correlation_id,
                message
            )
        } else {
            format!("[{}] [{}] {}", level.as_str(), self.name, message)
        };

        dispatch(level, &formatted);

        #[cfg(all(debug_assertions, feature = "stderr-log"))]
        eprintln!("{}", formatted);
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    // Structured logging methods for container events

    pub fn log_properties_created(&self, id: u32) {
        self.info(&format!("PROPERTIES_CREATED: id={}", id));
    }

    pub fn log_properties_cloned(&self, id: u32) {
        self.debug(&format!("PROPERTIES_CLONED: id={}", id));
    }

    pub fn log_value_set(&self, id: u32, key: &str, value: f64) {
        self.trace(&format!("VALUE_SET: id={}, key={}, value={}", id, key, value));
    }

    pub fn log_table_set(&self, id: u32, input: &str, output: &str, rows: usize) {
        self.debug(&format!(
            "TABLE_SET: id={}, input={}, output={}, rows={}",
            id, input, output, rows
        ));
    }

    pub fn log_values_copied(&self, source: u32, destination: u32, count: usize) {
        self.debug(&format!(
            "VALUES_COPIED: source={}, destination={}, count={}",
            source, destination, count
        ));
    }

    pub fn log_lookup_failed(&self, id: u32, reason: &str) {
        self.warn(&format!("LOOKUP_FAILED: id={}, reason={}", id, reason));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("MatProp")
    }
}

/// Install the global log callback.
///
/// The callback must stay valid until `clear_log_callback` is called or the
/// program exits.
pub fn set_log_callback(callback: LogCallback) {
    LOG_CALLBACK.store(callback as *mut (), Ordering::SeqCst);
}

/// Remove the global log callback. Subsequent log calls are dropped.
pub fn clear_log_callback() {
    LOG_CALLBACK.store(std::ptr::null_mut(), Ordering::SeqCst);
}

/// Whether a host callback is installed. The `log_*!` macros skip
/// formatting entirely when it is not.
pub fn has_log_callback() -> bool {
    !LOG_CALLBACK.load(Ordering::SeqCst).is_null()
}

/// Global log function for use without a Logger instance.
pub fn log(level: LogLevel, message: &str) {
    dispatch(level, message);
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if $crate::logger::has_log_callback() {
            $crate::logger::log($crate::logger::LogLevel::Info, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if $crate::logger::has_log_callback() {
            $crate::logger::log($crate::logger::LogLevel::Warn, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if $crate::logger::has_log_callback() {
            $crate::logger::log($crate::logger::LogLevel::Error, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::has_log_callback() {
            $crate::logger::log($crate::logger::LogLevel::Debug, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        if $crate::logger::has_log_callback() {
            $crate::logger::log($crate::logger::LogLevel::Trace, &format!($($arg)*))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::AtomicI32;

    static TEST_CALLBACK_COUNT: AtomicI32 = AtomicI32::new(0);

    extern "C" fn test_callback(_level: i32, _message: *const std::ffi::c_char) {
        TEST_CALLBACK_COUNT.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_logger_creation() {
        let logger = Logger::new("TestLogger");
        assert_eq!(logger.name, "TestLogger");
        assert_eq!(logger.min_level, LogLevel::Info);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_i32(4), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_i32(5), None);
        assert_eq!(LogLevel::from_i32(-1), None);
    }

    #[test]
    fn test_correlation_id() {
        let mut logger = Logger::new("Test");
        let id1 = logger.start_correlation();
        let id2 = Logger::new_correlation_id();
        assert!(id2 > id1);
        assert_eq!(logger.correlation_id(), id1);
    }

    #[test]
    #[serial]
    fn test_log_callback() {
        TEST_CALLBACK_COUNT.store(0, Ordering::SeqCst);
        set_log_callback(test_callback);

        let logger = Logger::new("Test").with_level(LogLevel::Info);
        logger.info("Test message");

        assert!(TEST_CALLBACK_COUNT.load(Ordering::SeqCst) >= 1);

        clear_log_callback();
        assert!(!has_log_callback());
    }

    #[test]
    #[serial]
    fn test_structured_logging() {
        let logger = Logger::new("Test").with_level(LogLevel::Trace);

        logger.log_properties_created(1);
        logger.log_properties_cloned(1);
        logger.log_value_set(1, "YOUNG_MODULUS", 2.1e11);
        logger.log_table_set(1, "TEMPERATURE", "YOUNG_MODULUS", 2);
        logger.log_values_copied(1, 2, 3);
        logger.log_lookup_failed(1, "Key not found: DENSITY");
    }

    #[test]
    #[serial]
    fn test_min_level_filtering() {
        TEST_CALLBACK_COUNT.store(0, Ordering::SeqCst);
        set_log_callback(test_callback);

        let logger = Logger::new("Test").with_level(LogLevel::Warn);
        logger.trace("trace");
        logger.debug("debug");
        logger.info("info");
        let count_before_warn = TEST_CALLBACK_COUNT.load(Ordering::SeqCst);

        logger.warn("warn");
        logger.error("error");
        let count_after = TEST_CALLBACK_COUNT.load(Ordering::SeqCst);
        assert!(count_after - count_before_warn >= 2, "Warn and Error should pass through");

        clear_log_callback();
    }

    #[test]
    #[serial]
    fn test_macros_without_callback_are_silent() {
        clear_log_callback();
        crate::log_info!("dropped {}", 1);
        crate::log_debug!("dropped {}", 2);
        assert!(!has_log_callback());
    }

    static FORMAT_COUNT: AtomicI32 = AtomicI32::new(0);

    struct CountsFormatting;

    impl std::fmt::Display for CountsFormatting {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            FORMAT_COUNT.fetch_add(1, Ordering::SeqCst);
            write!(f, "counted")
        }
    }

    #[test]
    #[serial]
    fn test_macros_skip_formatting_without_callback() {
        clear_log_callback();
        FORMAT_COUNT.store(0, Ordering::SeqCst);

        crate::log_trace!("{}", CountsFormatting);
        crate::log_debug!("{}", CountsFormatting);
        crate::log_info!("{}", CountsFormatting);
        crate::log_warn!("{}", CountsFormatting);
        crate::log_error!("{}", CountsFormatting);
        assert_eq!(FORMAT_COUNT.load(Ordering::SeqCst), 0);

        set_log_callback(test_callback);
        crate::log_trace!("{}", CountsFormatting);
        assert_eq!(FORMAT_COUNT.load(Ordering::SeqCst), 1);
        clear_log_callback();
    }

    #[test]
    #[serial]
    fn test_logger_delivers_to_callback_only() {
        TEST_CALLBACK_COUNT.store(0, Ordering::SeqCst);
        set_log_callback(test_callback);

        let logger = Logger::new("Test").with_level(LogLevel::Trace);
        logger.error("routed to the host");
        let delivered = TEST_CALLBACK_COUNT.load(Ordering::SeqCst);
        assert!(delivered >= 1);

        clear_log_callback();
        logger.error("dropped");
        assert_eq!(TEST_CALLBACK_COUNT.load(Ordering::SeqCst), delivered);
    }
}
