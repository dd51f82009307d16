/// Where suggestions are requested, and what caused the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    offset: usize,
    trigger: Option<char>,
}

impl Cursor {
    /// Invoked explicitly, e.g. while typing a word.
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            trigger: None,
        }
    }

    /// Invoked because `character` (space, comma, ...) was just typed.
    pub fn triggered_by(offset: usize, character: char) -> Self {
        Self {
            offset,
            trigger: Some(character),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn trigger(&self) -> Option<char> {
        self.trigger
    }

    /// Offset clamped into `text` and moved back onto a char boundary.
    pub fn clamp(&self, text: &str) -> usize {
        let mut offset = self.offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl From<usize> for Cursor {
    fn from(offset: usize) -> Self {
        Cursor::at(offset)
    }
}
