use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use sqlx::Error as SqlxError;
use std::io::Error as IoError;

use crate::ipc::payload::PayloadError;

mod crash_id;

pub use crash_id::CrashId;

/// A structured application error carried through every handler and logged
/// when an event cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    /// Machine readable error code.
    pub code: String,
    /// Human friendly message.
    pub message: String,
    /// Arbitrary key/value pairs that provide additional context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
    /// Optional nested cause that preserves the error chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<AppError>>,
    /// Set when the error was produced by a caught panic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_id: Option<CrashId>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Coarse classification of an [`AppError`] by its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inbound payload did not have the shape its event requires.
    Decode,
    /// A statement failed to prepare or execute, or a result failed to encode.
    Query,
    /// No row exists for the requested id.
    NotFound,
    Other,
}

impl AppError {
    /// Code used for errors created from free-form messages.
    pub const GENERIC_CODE: &'static str = "APP/GENERIC";
    pub const DECODE_CODE: &'static str = "IPC/DECODE";
    pub const NOT_FOUND_CODE: &'static str = "TODO/NOT_FOUND";
    pub const DB_OPEN_CODE: &'static str = "DB/OPEN";

    /// Construct a new application error with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError {
            code: code.into(),
            message: message.into(),
            context: HashMap::new(),
            cause: None,
            crash_id: None,
        }
    }

    /// The error returned when no todo item has the given id.
    pub fn not_found(id: i64) -> Self {
        AppError::new(Self::NOT_FOUND_CODE, format!("No item found with ID {id}"))
            .with_context("id", id.to_string())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &HashMap<String, String> {
        &self.context
    }

    pub fn cause(&self) -> Option<&AppError> {
        self.cause.as_deref()
    }

    pub fn crash_id(&self) -> Option<&CrashId> {
        self.crash_id.as_ref()
    }

    pub fn set_crash_id(&mut self, crash_id: CrashId) {
        self.crash_id = Some(crash_id);
    }

    pub fn kind(&self) -> ErrorKind {
        let code = self.code.as_str();
        if code == Self::DECODE_CODE {
            ErrorKind::Decode
        } else if code == Self::NOT_FOUND_CODE {
            ErrorKind::NotFound
        } else if code.starts_with("SQLX/") || code.starts_with("Sqlite/") || code.starts_with("JSON/")
        {
            ErrorKind::Query
        } else {
            ErrorKind::Other
        }
    }

    /// Adds a contextual key/value pair to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the nested cause for the error.
    pub fn with_cause(mut self, cause: AppError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Emit the error as a structured `tracing` event.
    pub fn log_with_event(&self, event: &str) {
        let crash_id = self
            .crash_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let cause = self
            .cause
            .as_deref()
            .map(ToString::to_string)
            .unwrap_or_default();
        tracing::error!(
            target: "todo_desk",
            event,
            code = %self.code,
            message = %self.message,
            context = ?self.context,
            cause = %cause,
            crash_id = %crash_id,
        );
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {} ({:?})", self.code, self.message, self.context)
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<IoError> for AppError {
    fn from(error: IoError) -> Self {
        let code = format!("IO/{:?}", error.kind());
        let mut app_error = AppError::new(code, error.to_string());
        if let Some(os_code) = error.raw_os_error() {
            app_error = app_error.with_context("os_code", os_code.to_string());
        }
        app_error
    }
}

impl From<SerdeJsonError> for AppError {
    fn from(error: SerdeJsonError) -> Self {
        let code = if error.is_data() {
            "JSON/DATA"
        } else if error.is_syntax() {
            "JSON/SYNTAX"
        } else if error.is_eof() {
            "JSON/EOF"
        } else if error.is_io() {
            "JSON/IO"
        } else {
            "JSON/ERROR"
        };

        let mut app_error = AppError::new(code, error.to_string());
        let line = error.line();
        if line > 0 {
            app_error = app_error.with_context("line", line.to_string());
        }
        let column = error.column();
        if column > 0 {
            app_error = app_error.with_context("column", column.to_string());
        }
        app_error
    }
}

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => AppError::new("SQLX/ROW_NOT_FOUND", "Record not found"),
            SqlxError::ColumnNotFound(name) => {
                AppError::new("SQLX/COLUMN_NOT_FOUND", format!("Column not found: {name}"))
            }
            SqlxError::PoolTimedOut => AppError::new(
                "SQLX/POOL_TIMEOUT",
                "Timed out acquiring a database connection",
            ),
            SqlxError::PoolClosed => AppError::new("SQLX/POOL_CLOSED", "Database pool is closed"),
            SqlxError::Io(err) => AppError::new("SQLX/IO", err.to_string())
                .with_context("io_kind", format!("{:?}", err.kind())),
            SqlxError::Database(db) => {
                let code = db
                    .code()
                    .map(|code| format!("Sqlite/{code}"))
                    .unwrap_or_else(|| "SQLX/DATABASE".to_string());
                let mut app_error = AppError::new(code, db.message().to_string());
                if let Some(constraint) = db.constraint() {
                    app_error = app_error.with_context("constraint", constraint.to_string());
                }
                app_error
            }
            SqlxError::ColumnDecode { index, source } => {
                AppError::new("SQLX/COLUMN_DECODE", source.to_string())
                    .with_context("column_index", index.to_string())
            }
            SqlxError::Decode(decode_err) => AppError::new("SQLX/DECODE", decode_err.to_string()),
            other => AppError::new("SQLX/ERROR", other.to_string()),
        }
    }
}

impl From<PayloadError> for AppError {
    fn from(error: PayloadError) -> Self {
        let mut app_error = AppError::new(AppError::DECODE_CODE, error.to_string());
        if let Some(event) = error.event() {
            app_error = app_error.with_context("event", event);
        }
        app_error
    }
}

thread_local! {
    static LAST_PANIC_CRASH_ID: RefCell<Option<CrashId>> = const { RefCell::new(None) };
}

/// Render a panic payload as text.
pub fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Crash id recorded by the panic hook on this thread, if any.
pub fn take_panic_crash_id() -> Option<CrashId> {
    LAST_PANIC_CRASH_ID.with(|slot| slot.borrow_mut().take())
}

/// Install a process-wide panic hook that logs every panic with a fresh crash id.
///
/// The id is remembered per thread so the panic fence in [`crate::util`] can
/// attach the same id to the error it returns.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let crash_id = CrashId::new();
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_default();
        tracing::error!(
            target: "todo_desk",
            event = "panic",
            crash_id = %crash_id,
            location = %location,
            message = %panic_payload(info.payload()),
        );
        LAST_PANIC_CRASH_ID.with(|slot| *slot.borrow_mut() = Some(crash_id));
        previous(info);
    }));
}
