use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at byte {pos}")]
    UnexpectedEof { pos: usize },

    #[error("unexpected character at byte {pos}: expected {expected}, found {found:?}")]
    UnexpectedChar {
        pos: usize,
        expected: String,
        found: char,
    },

    #[error("mismatched closing tag at byte {pos}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("closing tag </{name}> at byte {pos} has no matching open tag")]
    StrayClosingTag { pos: usize, name: String },

    #[error("unterminated comment starting at byte {pos}")]
    UnterminatedComment { pos: usize },

    #[error("unterminated expression starting at byte {pos}")]
    UnterminatedExpression { pos: usize },

    #[error("unterminated attribute value starting at byte {pos}")]
    UnterminatedAttributeValue { pos: usize },
}

impl ParseError {
    pub fn unexpected_eof(pos: usize) -> Self {
        Self::UnexpectedEof { pos }
    }

    pub fn unexpected_char(pos: usize, expected: impl Into<String>, found: char) -> Self {
        Self::UnexpectedChar {
            pos,
            expected: expected.into(),
            found,
        }
    }

    /// Byte offset the error points at.
    pub fn pos(&self) -> usize {
        match self {
            Self::UnexpectedEof { pos }
            | Self::UnexpectedChar { pos, .. }
            | Self::MismatchedClosingTag { pos, .. }
            | Self::StrayClosingTag { pos, .. }
            | Self::UnterminatedComment { pos }
            | Self::UnterminatedExpression { pos }
            | Self::UnterminatedAttributeValue { pos } => *pos,
        }
    }
}
