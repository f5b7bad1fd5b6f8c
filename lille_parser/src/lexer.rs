//! Lexer for Lille source code
//!
//! Wraps the logos-generated lexer. String literals and the fractional part
//! of real numbers are scanned by hand and the logos lexer is bumped past
//! them.

use logos::Logos;

use crate::error::LexError;
use crate::span::{SourceMap, Span};
use crate::token::Symbol;

/// A symbol with its span and source text
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'a> {
    pub symbol: Symbol,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> SpannedToken<'a> {
    pub fn new(symbol: Symbol, span: Span, text: &'a str) -> Self {
        Self { symbol, span, text }
    }
}

/// Lille lexer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Symbol>,
    source_map: SourceMap,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.inner.span().end)
            .finish()
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Symbol::lexer(source),
            source_map: SourceMap::new(source),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Span covering the end of the source, used for the end-of-program token
    pub fn eof_span(&self) -> Span {
        self.source_map.span(self.source.len(), self.source.len())
    }

    fn make_token(&self, symbol: Symbol, start: usize, end: usize) -> SpannedToken<'a> {
        SpannedToken::new(symbol, self.source_map.span(start, end), &self.source[start..end])
    }

    /// Get the next token, `None` once the source is exhausted
    pub fn next_token(&mut self) -> Option<Result<SpannedToken<'a>, LexError>> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let (start, end) = (span.start, span.end);

        match result {
            Ok(Symbol::DoubleQuote) => match self.scan_string_to_close(end) {
                Ok(string_end) => {
                    self.inner.bump(string_end - end);
                    Some(Ok(self.make_token(Symbol::StringLiteral, start, string_end)))
                }
                Err(e) => {
                    let rest = self.source.len() - end;
                    let line_end = memchr::memchr(b'\n', &self.source.as_bytes()[end..])
                        .unwrap_or(rest);
                    self.inner.bump(line_end);
                    Some(Err(e))
                }
            },

            Ok(Symbol::IntegerLiteral) => {
                let number_end = self.scan_fraction(end);
                if number_end > end {
                    self.inner.bump(number_end - end);
                    Some(Ok(self.make_token(Symbol::RealLiteral, start, number_end)))
                } else {
                    Some(Ok(self.make_token(Symbol::IntegerLiteral, start, end)))
                }
            }

            Ok(symbol) => Some(Ok(self.make_token(symbol, start, end))),

            Err(()) => Some(Err(LexError::UnrecognizedCharacter {
                found: self.source[start..end].to_string(),
                span: self.source_map.span(start, end),
            })),
        }
    }

    /// Scan to the closing quote of a string literal; `""` stands for one
    /// quote and a newline terminates the literal in error.
    fn scan_string_to_close(&self, start: usize) -> Result<usize, LexError> {
        let bytes = self.source.as_bytes();
        let mut pos = start;

        while let Some(offset) = memchr::memchr2(b'"', b'\n', &bytes[pos..]) {
            pos += offset;
            if bytes[pos] == b'\n' {
                break;
            }
            if bytes.get(pos + 1) == Some(&b'"') {
                pos += 2;
                continue;
            }
            return Ok(pos + 1);
        }

        Err(LexError::UnterminatedString {
            span: self.source_map.span(start - 1, pos.min(bytes.len())),
        })
    }

    /// Extend an integer literal ending at `end` with `.digits[E[+-]digits]`.
    /// Returns `end` unchanged when no fraction follows, which keeps `1..10`
    /// an integer followed by a range.
    fn scan_fraction(&self, end: usize) -> usize {
        let bytes = self.source.as_bytes();
        let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

        if bytes.get(end) != Some(&b'.') || !is_digit(end + 1) {
            return end;
        }
        let mut pos = end + 1;
        while is_digit(pos) {
            pos += 1;
        }

        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut exp = pos + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if is_digit(exp) {
                while is_digit(exp) {
                    exp += 1;
                }
                pos = exp;
            }
        }
        pos
    }

    /// Collect all tokens (for debugging)
    pub fn collect_all(mut self) -> Vec<Result<SpannedToken<'a>, LexError>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<SpannedToken<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(source: &str) -> Vec<Symbol> {
        Lexer::new(source)
            .filter_map(|r| r.ok())
            .map(|t| t.symbol)
            .collect()
    }

    #[test]
    fn test_program_header() {
        assert_eq!(
            symbols("program P is begin null; end P;"),
            vec![
                Symbol::Program,
                Symbol::Identifier,
                Symbol::Is,
                Symbol::Begin,
                Symbol::Null,
                Symbol::Semicolon,
                Symbol::End,
                Symbol::Identifier,
                Symbol::Semicolon,
            ]
        );
    }

    #[test]
    fn test_real_literals() {
        let tokens: Vec<_> = Lexer::new("2.0 3.25E-2 7.5e3 4")
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].symbol, Symbol::RealLiteral);
        assert_eq!(tokens[0].text, "2.0");
        assert_eq!(tokens[1].text, "3.25E-2");
        assert_eq!(tokens[2].text, "7.5e3");
        assert_eq!(tokens[3].symbol, Symbol::IntegerLiteral);
    }

    #[test]
    fn test_range_is_not_a_real() {
        assert_eq!(
            symbols("1..10"),
            vec![Symbol::IntegerLiteral, Symbol::Range, Symbol::IntegerLiteral]
        );
    }

    #[test]
    fn test_exponent_needs_digits() {
        // `E` without digits belongs to the next identifier
        assert_eq!(
            symbols("1.5E"),
            vec![Symbol::RealLiteral, Symbol::Identifier]
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens: Vec<_> = Lexer::new(r#"write("say ""hi"" -- not a comment");"#)
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(tokens[2].symbol, Symbol::StringLiteral);
        assert_eq!(tokens[2].text, r#""say ""hi"" -- not a comment""#);
        assert_eq!(tokens[3].symbol, Symbol::RParen);
        assert_eq!(tokens[4].symbol, Symbol::Semicolon);
    }

    #[test]
    fn test_unterminated_string() {
        let results: Vec<_> = Lexer::new("write(\"abc\nnull").collect();
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(LexError::UnterminatedString { .. }))));
        // Lexing resumes on the next line
        assert!(matches!(results.last(), Some(Ok(t)) if t.symbol == Symbol::Null));
    }

    #[test]
    fn test_unrecognized_character() {
        let results = Lexer::new("x # y").collect_all();
        assert_eq!(results.len(), 3);
        match &results[1] {
            Err(LexError::UnrecognizedCharacter { found, span }) => {
                assert_eq!(found, "#");
                assert_eq!(span.column, 3);
            }
            other => panic!("expected lexer error, got {other:?}"),
        }
    }

    #[test]
    fn test_multiline_spans() {
        let tokens: Vec<_> = Lexer::new("begin\n  null;\nend")
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
        assert_eq!(tokens[3].span.line, 3);
    }
}
