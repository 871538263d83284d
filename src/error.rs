use std::fmt;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! grammar_error {
    ($input:expr, $position:expr, $msg:expr) => {
        crate::Error::GrammarParse {
            message: $msg.to_string(),
            input: $input.to_string(),
            position: $position,
        }
    };

    ($input:expr, $position:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::GrammarParse {
            message: format!($fmt, $($arg)*),
            input: $input.to_string(),
            position: $position,
        }
    };
}

/// Classification of every [`Error`] into the failure taxonomy of the scanner.
///
/// The scan driver uses the classification to decide what to do with a unit: a
/// [`FailureKind::MalformedFormat`] or [`FailureKind::ResourceIo`] failure abandons the
/// unit, a [`FailureKind::Skip`] is counted but not reported as a failure, and a
/// [`FailureKind::GrammarParse`] failure only drops the attribute or member it occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Structural violation of the binary class file layout
    MalformedFormat,
    /// Intentional exclusion, not an error
    Skip,
    /// A signature, descriptor or annotation value does not conform to its grammar
    GrammarParse,
    /// A type name collided across two sources during linking
    LinkConflict,
    /// The byte source could not provide the data
    ResourceIo,
    /// A query was cancelled cooperatively
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MalformedFormat => write!(f, "malformed"),
            FailureKind::Skip => write!(f, "skip"),
            FailureKind::GrammarParse => write!(f, "grammar"),
            FailureKind::LinkConflict => write!(f, "conflict"),
            FailureKind::ResourceIo => write!(f, "io"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Reason why a compiled unit was intentionally not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The unit describes `java.lang.Object`, the root of the type system
    RootObjectType,
    /// The unit is not public and the policy does not ignore class visibility
    Invisible,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RootObjectType => write!(f, "root object type"),
            SkipReason::Invisible => write!(f, "not visible under scan policy"),
        }
    }
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Binary Format Errors
/// - [`Error::Malformed`] - Corrupted or invalid class file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the input
/// - [`Error::Empty`] - Empty input provided
///
/// ## Grammar Errors
/// - [`Error::GrammarParse`] - A descriptor, signature or annotation value is invalid
/// - [`Error::RecursionLimit`] - Maximum nesting depth exceeded while parsing
///
/// ## Scan Control
/// - [`Error::Skipped`] - The unit was intentionally excluded
/// - [`Error::LinkConflict`] - A type name was provided by more than one source
/// - [`Error::Cancelled`] - A query was cancelled
///
/// ## I/O and Synchronization
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::LockError`] - Thread synchronization failure
///
/// # Examples
///
/// ```rust
/// use classscope::{Error, FailureKind};
///
/// let error = Error::Empty;
/// assert_eq!(error.kind(), FailureKind::MalformedFormat);
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The class file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the input.
    #[error("Out of Bound read would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// A descriptor, generic signature or annotation value violated its grammar.
    #[error("Grammar violation at position {position} in '{input}': {message}")]
    GrammarParse {
        /// What was expected or found
        message: String,
        /// The text (or a description of the binary element) being parsed
        input: String,
        /// Character or byte position of the violation
        position: usize,
    },

    /// Recursion limit reached.
    ///
    /// Nested generic signatures and annotation values are bounded to protect the stack
    /// against adversarial input. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The compiled unit was intentionally excluded. This is a signal, not a failure.
    #[error("Skipped - {0}")]
    Skipped(SkipReason),

    /// A fully-qualified type name was provided by more than one source.
    #[error("Type {name} from {rejected} is masked by the definition from {kept}")]
    LinkConflict {
        /// The duplicated type name
        name: String,
        /// The source whose definition is authoritative
        kept: String,
        /// The source whose definition was discarded
        rejected: String,
    },

    /// A query was cancelled between two expansion steps.
    #[error("Operation was cancelled")]
    Cancelled,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Failed to lock target.
    #[error("Failed to lock target")]
    LockError,
}

impl Error {
    /// Classify this error into the scanner's failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Malformed { .. }
            | Error::OutOfBounds { .. }
            | Error::Empty
            | Error::LockError => FailureKind::MalformedFormat,
            Error::GrammarParse { .. } | Error::RecursionLimit(_) => FailureKind::GrammarParse,
            Error::Skipped(_) => FailureKind::Skip,
            Error::LinkConflict { .. } => FailureKind::LinkConflict,
            Error::Cancelled => FailureKind::Cancelled,
            Error::FileError(_) => FailureKind::ResourceIo,
        }
    }

    /// Returns `true` if this is an intentional skip signal rather than a failure.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::Skipped(_))
    }

    /// Returns `true` if the error only invalidates the attribute being parsed.
    #[must_use]
    pub fn is_grammar(&self) -> bool {
        self.kind() == FailureKind::GrammarParse
    }
}
