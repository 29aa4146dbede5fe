//! Shared error and source-location types used across all three front ends.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// A span with no useful location, used for whole-file errors
    /// (missing directive, empty input) that cannot be anchored to a line.
    pub fn unknown() -> Self {
        Self { line: 0, col: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub span: Span,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            file: file.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Lexical
    UnterminatedString,
    UnterminatedComment,
    IntegerOutOfRange,
    UnexpectedCharacter,

    // Syntactic
    UnexpectedToken,
    ExpectedToken,

    // Semantic
    UndefinedSymbol,
    DuplicateDeclaration,
    InvalidReturn,
    OffsetOutOfRange,

    // I/O
    Io,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.span.line > 0 {
            write!(
                f,
                "{}:{}:{}: error: {}",
                self.file, self.span.line, self.span.col, self.message
            )
        } else {
            write!(f, "{}: error: {}", self.file, self.message)
        }
    }
}

impl std::error::Error for CompileError {}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        CompileError::new(ErrorKind::Io, err.to_string(), "<io>", Span::unknown())
    }
}
