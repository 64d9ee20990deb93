//! Error handling types shared by every IFJ18 crate.
//!
//! All stages report failures through one [`Error`] type: a message, an
//! optional source position, and an [`ErrorKind`] that classifies the failure
//! and maps it to the numeric exit codes the IFJ18 toolchain uses.
//!
//! # Examples
//!
//! ```rust
//! use ifj_syntax::error::{Error, ErrorKind, Result, error_at};
//!
//! fn expect_digit(c: char, line: usize, col: usize) -> Result<u32> {
//!     match c.to_digit(10) {
//!         Some(d) => Ok(d),
//!         None => error_at(ErrorKind::Lexical, line, col, format!("Unexpected '{}'", c)),
//!     }
//! }
//!
//! let err = expect_digit('x', 3, 7).unwrap_err();
//! assert_eq!(err.to_string(), "Unexpected 'x' at 3:7");
//! assert_eq!(err.code(), 1);
//! ```

use std::fmt;

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid character for the lexeme being scanned.
    Lexical,
    /// No shift/reduce relation applies, or the expression is empty.
    Syntax,
    /// An identifier that the symbol table does not know.
    Undeclared,
    /// Operand types that an operator cannot accept.
    Semantic,
    /// Broken parser invariant; never expected in practice.
    Internal,
    /// Failure while executing IFJcode18, carrying its runtime code.
    Runtime(u8),
    /// Reading or writing files.
    Io,
}

impl ErrorKind {
    /// Numeric outcome code of this kind.
    ///
    /// Success is `0` and has no kind.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::Lexical => 1,
            ErrorKind::Syntax => 2,
            ErrorKind::Undeclared => 3,
            ErrorKind::Semantic => 4,
            ErrorKind::Runtime(code) => i32::from(code),
            ErrorKind::Internal | ErrorKind::Io => 99,
        }
    }

    /// Short label used when rendering diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "Lexical error",
            ErrorKind::Syntax => "Syntax error",
            ErrorKind::Undeclared => "Undeclared identifier",
            ErrorKind::Semantic => "Semantic error",
            ErrorKind::Internal => "Internal error",
            ErrorKind::Runtime(_) => "Runtime error",
            ErrorKind::Io => "I/O error",
        }
    }
}

/// An error that occurred while scanning, compiling or running IFJ18 code.
///
/// # Fields
///
/// - `kind`: what went wrong, see [`ErrorKind`]
/// - `msg`: human-readable error description
/// - `line`: optional 1-based line number in the source file
/// - `col`: optional 1-based column number in the source file
///
/// ```rust
/// use ifj_syntax::{Error, ErrorKind};
///
/// let err = Error::with_span(ErrorKind::Syntax, "LBRCKT in expression cannot be followed with EOF", 1, 7);
/// assert_eq!(err.to_string(), "LBRCKT in expression cannot be followed with EOF at 1:7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Classification of the failure
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates a new error with the given message and source location.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    /// Shorthand for `self.kind.code()`.
    pub fn code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, e.to_string())
    }
}

/// A specialized `Result` type for IFJ18 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create an error result.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Convenience function to create an error result with source location.
pub fn error_at<T>(kind: ErrorKind, line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(kind, msg, line, col))
}
