//! Byte spans into doc comment and include text.

use std::ops::Range;

use serde::Serialize;

/// A half-open byte range into the raw text an element was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic_functionality() {
        let span = Span::new(5..10);
        assert_eq!(span.start(), 5);
        assert_eq!(span.end(), 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    proptest::proptest! {
        #[test]
        fn prop_reversed_ranges_collapse(start in 0usize..1000, end in 0usize..1000) {
            let span = Span::new(start..end);
            proptest::prop_assert_eq!(span.start(), start);
            proptest::prop_assert!(span.end() >= span.start());
            proptest::prop_assert_eq!(span.len(), end.saturating_sub(start));
        }
    }
}
