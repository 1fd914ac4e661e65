/// Byte range in the expression source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// An invalid expression. Tokenizer and parser failures share this one type:
/// the parser is all-or-nothing, so the only useful detail is where it broke.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Format the error with a caret line under the offending part of the source.
    pub fn format_with_source(&self, source: &str) -> String {
        let start = self.span.start.min(source.len());
        let width = self.span.end.saturating_sub(self.span.start).max(1);
        let prefix = source.get(..start).map_or(start, |p| p.chars().count());
        format!(
            "invalid expression: {}\n  {source}\n  {}{}",
            self.message,
            " ".repeat(prefix),
            "^".repeat(width),
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid expression: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_span() {
        let err = ParseError::new("Expected ')'", Span::new(2, 3));
        let text = err.format_with_source("(z");
        assert!(text.ends_with("    ^"));
        assert!(text.starts_with("invalid expression: Expected ')'"));
    }

    #[test]
    fn merge_covers_both() {
        let s = Span::new(3, 5).merge(Span::new(1, 2));
        assert_eq!(s, Span::new(1, 5));
    }
}
