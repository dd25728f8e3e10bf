use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpaError {
    // File and I/O errors
    #[error("File read error: {0}")]
    FileReadError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    // Lexical analysis errors
    #[error("Lexer error at line {line} column {column}: {message}")]
    LexerError {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("Invalid number '{number}' at line {line}")]
    InvalidNumber { number: String, line: usize },

    // Parsing errors
    #[error("Syntax error at line {line}: expect {expected}, got {found}")]
    SyntaxError {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("Syntax error: expect {expected}, got end of input")]
    UnexpectedEof { expected: String },

    // Program validity errors
    #[error("Semantic error: {message}")]
    SemanticError { message: String },

    // Query preprocessing errors, absorbed before reaching callers
    #[error("Query error: {message}")]
    QueryError { message: String },
}

impl SpaError {
    /// Create a lexer error with position information
    pub fn lexer_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        SpaError::LexerError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a syntax error
    pub fn syntax_error(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        SpaError::SyntaxError {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        SpaError::UnexpectedEof {
            expected: expected.into(),
        }
    }

    /// Create an error for a program that parses but cannot be analyzed
    pub fn semantic_error(message: impl Into<String>) -> Self {
        SpaError::SemanticError {
            message: message.into(),
        }
    }

    pub fn query_error(message: impl Into<String>) -> Self {
        SpaError::QueryError {
            message: message.into(),
        }
    }
}

// Type alias for Result with SpaError
pub type SpaResult<T> = Result<T, SpaError>;
