//! Offset-safe text patching.
//!
//! Replacements are collected in the coordinates of the original text, in
//! any order, and applied in a single left-to-right pass. Nothing is ever
//! patched twice: the collapser guarantees disjoint ranges, and the buffer
//! enforces it.

use crate::errors::TransformError;

#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

#[derive(Debug, Clone)]
pub struct PatchBuffer<'a> {
    original: &'a str,
    edits: Vec<Edit>,
}

impl<'a> PatchBuffer<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    /// Queues a replacement of `original[start..end]`. A zero-width range is
    /// an insertion.
    pub fn replace(&mut self, start: usize, end: usize, text: String) {
        self.edits.push(Edit { start, end, text });
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies all queued edits. Overlapping ranges are a pipeline bug and
    /// fail rather than corrupt the output.
    pub fn into_string(self) -> Result<String, TransformError> {
        let mut edits = self.edits;
        edits.sort_by_key(|edit| (edit.start, edit.end));

        let mut out = String::with_capacity(self.original.len());
        let mut cursor = 0;
        for edit in edits {
            if edit.start < cursor {
                return Err(TransformError::OverlappingEdits { at: edit.start });
            }
            out.push_str(&self.original[cursor..edit.start]);
            out.push_str(&edit.text);
            cursor = edit.end;
        }
        out.push_str(&self.original[cursor..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_edits_in_original_coordinates_regardless_of_order() {
        let mut buffer = PatchBuffer::new("one two three");
        buffer.replace(8, 13, "3".into());
        buffer.replace(0, 3, "1".into());
        assert_eq!(buffer.into_string().unwrap(), "1 two 3");
    }

    #[test]
    fn zero_width_edit_inserts() {
        let mut buffer = PatchBuffer::new("ab");
        buffer.replace(1, 1, "-".into());
        assert_eq!(buffer.into_string().unwrap(), "a-b");
    }

    #[test]
    fn no_edits_returns_the_original() {
        let buffer = PatchBuffer::new("unchanged");
        assert!(buffer.is_empty());
        assert_eq!(buffer.into_string().unwrap(), "unchanged");
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let mut buffer = PatchBuffer::new("abcdef");
        buffer.replace(0, 4, "x".into());
        buffer.replace(2, 6, "y".into());
        assert!(matches!(
            buffer.into_string(),
            Err(TransformError::OverlappingEdits { at: 2 }),
        ));
    }

    #[test]
    fn adjacent_edits_are_fine() {
        let mut buffer = PatchBuffer::new("abcd");
        buffer.replace(0, 2, "x".into());
        buffer.replace(2, 4, "y".into());
        assert_eq!(buffer.into_string().unwrap(), "xy");
    }
}
