use std::fmt;
use thiserror::Error;

/// What went wrong, independent of where it happened.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("assignment has no target path")]
    EmptyTargetPath,

    #[error("\"{segment}\" holds a {found}, not a mapping")]
    TypeConflict { segment: String, found: &'static str },

    #[error("{{{{{reference}}}}} not found in any of {sources} source(s)")]
    ReferenceNotFound { reference: String, sources: usize },

    #[error("no sources to resolve references from")]
    NoSourcesProvided,

    #[error("cannot get \"{token}\" from a scalar")]
    NotIndexable { token: String },

    #[error("{record} has no field \"{field}\"")]
    FieldNotFound { record: &'static str, field: String },

    #[error("key \"{key}\" not found")]
    KeyNotFound { key: String },

    #[error("index {index} is out of range 0..{len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("\"{token}\" is not a sequence index")]
    NotAnIndex { token: String },

    #[error("mapping keys are {key_type}, not strings")]
    UnsupportedKeyType { key_type: &'static str },

    #[error("interchange encoding failed: {0}")]
    Interchange(#[from] serde_json::Error),

    #[error("invalid value: {0}")]
    Invalid(String),

    #[error("custom rendering failed")]
    RenderFailed,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmptyTargetPath => "empty-target-path",
            ErrorKind::TypeConflict { .. } => "type-conflict",
            ErrorKind::ReferenceNotFound { .. } => "reference-not-found",
            ErrorKind::NoSourcesProvided => "no-sources-provided",
            ErrorKind::NotIndexable { .. } => "not-indexable",
            ErrorKind::FieldNotFound { .. } => "field-not-found",
            ErrorKind::KeyNotFound { .. } => "key-not-found",
            ErrorKind::IndexOutOfRange { .. } => "index-out-of-range",
            ErrorKind::NotAnIndex { .. } => "not-an-index",
            ErrorKind::UnsupportedKeyType { .. } => "unsupported-key-type",
            ErrorKind::Interchange(_) => "interchange",
            ErrorKind::Invalid(_) => "invalid",
            ErrorKind::RenderFailed => "render-failed",
        }
    }

    /// True for failures that only mean "nothing at this path", such as a
    /// name used against a sequence. Non-string mapping keys are not misses.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            ErrorKind::KeyNotFound { .. }
                | ErrorKind::FieldNotFound { .. }
                | ErrorKind::IndexOutOfRange { .. }
                | ErrorKind::NotAnIndex { .. }
                | ErrorKind::NotIndexable { .. }
        )
    }
}

/// An error with the positional context it was reported through.
///
/// Context frames are pushed innermost first while the error travels up
/// the call stack, and displayed outermost first.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    context: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            context: Vec::new(),
        }
    }

    /// Wrap with one more (outer) frame of context.
    pub fn context(mut self, frame: impl Into<String>) -> Self {
        self.context.push(frame.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Context frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.context.iter().rev().map(String::as_str)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Interchange(err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            write!(f, "{}: ", frame)?;
        }
        write!(f, "{} ({})", self.kind, self.code())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Interchange(err) => Some(err),
            _ => None,
        }
    }
}
