//! Error types for SVF parsing.

/// Errors that can occur when reading SVF text.
///
/// `statement` counts `;`-terminated statements from 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SvfError {
    /// The statement keyword is not an SVF command.
    #[error("statement {statement}: unknown command '{keyword}'")]
    UnknownCommand {
        /// Statement number.
        statement: usize,
        /// The keyword as written.
        keyword: String,
    },

    /// The statement's arguments do not parse.
    #[error("statement {statement}: {message}")]
    Syntax {
        /// Statement number.
        statement: usize,
        /// What was wrong.
        message: String,
    },

    /// Text follows the last `;`.
    #[error("unterminated statement at end of input")]
    Unterminated,
}
