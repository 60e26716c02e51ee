//! Recognized text buffer.

/// Ordered sequence of recognized characters.
///
/// The only mutations are [`append`](TextBuffer::append) and
/// [`erase_last`](TextBuffer::erase_last).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, ch: char) {
        self.chars.push(ch);
    }

    /// Remove the last character. Does nothing on an empty buffer.
    pub fn erase_last(&mut self) -> Option<char> {
        self.chars.pop()
    }

    pub fn current(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Buffer contents as a `String` for rendering.
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut text = TextBuffer::new();
        text.append('4');
        text.append('2');
        assert_eq!(text.current(), &['4', '2']);
        assert_eq!(text.as_string(), "42");
    }

    #[test]
    fn test_erase_last_removes_tail() {
        let mut text = TextBuffer::new();
        text.append('1');
        text.append('7');
        assert_eq!(text.erase_last(), Some('7'));
        assert_eq!(text.as_string(), "1");
    }

    #[test]
    fn test_erase_last_on_empty_is_noop() {
        let mut text = TextBuffer::new();
        assert_eq!(text.erase_last(), None);
        assert_eq!(text.erase_last(), None);
        assert!(text.is_empty());
        assert_eq!(text.len(), 0);
    }
}
