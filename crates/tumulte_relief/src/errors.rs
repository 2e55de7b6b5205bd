//! Parse errors.

use serde::Serialize;

/// What went wrong while parsing a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// No root element in the file.
    MissingRoot,
    /// A `<` opened a tag without a valid name.
    InvalidTagName,
    /// The file ended inside an open tag (`<div class="a"`).
    UnterminatedTag,
    /// The file ended before an element was closed.
    UnclosedElement,
    /// A closing tag does not match the open element.
    MismatchedClosingTag,
    /// A `{` expression was never closed.
    UnterminatedExpression,
    /// A quoted attribute value was never closed.
    UnterminatedAttributeValue,
    /// A `<!--` comment was never closed.
    UnterminatedComment,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingRoot => "component has no root element",
            Self::InvalidTagName => "invalid tag name",
            Self::UnterminatedTag => "unterminated tag",
            Self::UnclosedElement => "element is not closed",
            Self::MismatchedClosingTag => "closing tag does not match the open element",
            Self::UnterminatedExpression => "unterminated expression",
            Self::UnterminatedAttributeValue => "unterminated attribute value",
            Self::UnterminatedComment => "unterminated comment",
        }
    }
}

/// A fatal parse error at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at offset {offset}", .code.message())]
pub struct ParseError {
    pub code: ErrorCode,
    pub offset: u32,
}

impl ParseError {
    pub fn new(code: ErrorCode, offset: u32) -> Self {
        Self { code, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::new(ErrorCode::UnclosedElement, 12);
        assert_eq!(err.to_string(), "element is not closed at offset 12");
    }
}
