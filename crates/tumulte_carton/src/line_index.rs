//! Byte offset <-> editor position conversion.
//!
//! Offsets inside the core are UTF-8 byte offsets into the raw component
//! text. Editors address text by 0-based line and UTF-16 code unit, so the
//! conversion goes through a rope built once per text.

use ropey::Rope;
use serde::{Deserialize, Serialize};

/// Editor position (0-based line, UTF-16 character).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Editor range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Line index over a text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Convert a byte offset to a position. `None` past the end of the text
    /// or inside a multi-byte character.
    pub fn position_of(&self, offset: u32) -> Option<Position> {
        let offset = offset as usize;
        if offset > self.rope.len_bytes() {
            return None;
        }

        let char_idx = self.rope.try_byte_to_char(offset).ok()?;
        if self.rope.char_to_byte(char_idx) != offset {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let character =
            self.rope.char_to_utf16_cu(char_idx) - self.rope.char_to_utf16_cu(line_start);

        Some(Position {
            line: line as u32,
            character: character as u32,
        })
    }

    /// Convert a byte range to an editor range.
    pub fn range_of(&self, start: u32, end: u32) -> Option<Range> {
        Some(Range::new(self.position_of(start)?, self.position_of(end)?))
    }

    /// Convert a position to a byte offset, clamping the character to the
    /// line length.
    pub fn offset_of(&self, position: Position) -> Option<u32> {
        let line = position.line as usize;
        if line >= self.rope.len_lines() {
            return None;
        }

        let line_start = self.rope.line_to_char(line);
        let line_start_cu = self.rope.char_to_utf16_cu(line_start);
        let line_len_cu = self.rope.line(line).len_utf16_cu();
        let target_cu = line_start_cu + (position.character as usize).min(line_len_cu);
        let char_idx = self.rope.utf16_cu_to_char(target_cu);

        self.rope
            .try_char_to_byte(char_idx)
            .ok()
            .map(|offset| offset as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of() {
        let index = LineIndex::new("<app>\n  <p>{ x }</p>\n</app>");
        assert_eq!(index.position_of(0), Some(Position::new(0, 0)));
        assert_eq!(index.position_of(6), Some(Position::new(1, 0)));
        assert_eq!(index.position_of(11), Some(Position::new(1, 5)));
        assert_eq!(index.position_of(1000), None);
    }

    #[test]
    fn test_position_counts_utf16_units() {
        // "é" is 2 bytes / 1 unit, "😀" is 4 bytes / 2 units
        let index = LineIndex::new("é😀x");
        assert_eq!(index.position_of(2), Some(Position::new(0, 1)));
        assert_eq!(index.position_of(6), Some(Position::new(0, 3)));
        assert_eq!(index.position_of(1), None);
    }

    #[test]
    fn test_offset_of() {
        let index = LineIndex::new("line1\nline2\nline3");
        assert_eq!(index.offset_of(Position::new(0, 0)), Some(0));
        assert_eq!(index.offset_of(Position::new(1, 2)), Some(8));
        assert_eq!(index.offset_of(Position::new(2, 99)), Some(17));
        assert_eq!(index.offset_of(Position::new(3, 0)), None);
    }

    #[test]
    fn test_round_trip_with_multibyte() {
        let text = "<p>日本</p>\n{ 語 }";
        let index = LineIndex::new(text);
        for (offset, _) in text.char_indices() {
            let position = index.position_of(offset as u32).unwrap();
            assert_eq!(index.offset_of(position), Some(offset as u32));
        }
    }
}
