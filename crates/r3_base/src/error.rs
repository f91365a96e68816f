use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Errors carry the path they concern, which is what every r3 diagnostic has to show
- Context chains render as a tree in Debug output
- Span traces are captured from the active tracing span at construction time
 */

/// Error variants that can occur in r3 operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// A filesystem operation on `path` failed
    FileError { path: PathBuf, source: io::Error },

    /// Catch-all for other errors with a message
    Message { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::FileError { path, source } => write!(f, "{}: {}", path.display(), source),
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }
}

/* 📖 # Why separate ErrorKind and R3Error?
ErrorKind holds the structural variant that callers can match on.
R3Error wraps it with the context strings added during propagation and the span trace
captured when the error was created.
*/

/// Error type used throughout r3, wrapping an [`ErrorKind`] with context.
pub struct R3Error {
    kind: ErrorKind,
    context: Vec<String>,
    span_trace: SpanTrace,
}

impl R3Error {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a message error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates an error for a failed filesystem operation on `path`.
    pub fn file_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl StdError for R3Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for R3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for context in &self.context {
            write!(f, "{}: ", context)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl fmt::Debug for R3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let context_count = self.context.len();
        for (i, context) in self.context.iter().enumerate() {
            let branch = if i + 1 == context_count { "└─" } else { "├─" };
            write!(f, "\n{} {}", branch, context)?;
        }
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            write!(f, "\nTrace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/* 📖 # Why use Box<R3Error> in the result type?

Boxing the error keeps the result type small, which makes the common success path cheaper.
*/

/// Standard result type for r3 operations.
pub type R3Result<T> = std::result::Result<T, Box<R3Error>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> R3Result<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> R3Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for R3Result<T> {
    fn context(self, context: impl Into<String>) -> R3Result<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> R3Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.context(f())))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::R3Error::message(format!($($arg)*)))
    };
}

/// Returns early with a boxed message error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
