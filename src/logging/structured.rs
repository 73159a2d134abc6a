//! Structured logging utilities.
//!
//! Provides context-aware logging with board_id and record_id included
//! in every log message.

use std::fmt;

/// Logging context for one board instance.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub board_id: String,
    pub record_id: Option<String>,
}

impl LogContext {
    pub fn new(board_id: &str) -> Self {
        Self {
            board_id: board_id.to_string(),
            record_id: None,
        }
    }

    pub fn with_record(&self, record_id: &str) -> Self {
        Self {
            board_id: self.board_id.clone(),
            record_id: Some(record_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record_id {
            Some(rid) => write!(f, "[board={}] [record={}]", self.board_id, rid),
            None => write!(f, "[board={}]", self.board_id),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        )
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        )
    };
}

/// Log an error message with context.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::error!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        )
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        )
    };
}
