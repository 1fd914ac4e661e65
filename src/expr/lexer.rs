use num_complex::Complex64;

use super::error::{ParseError, Span};
use super::literal;
use super::ops::UnaryOp;
use crate::model::function::VARIABLE_NAME;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// The function argument `z`.
    Arg,
    Number(Complex64),
    /// `exp`, `ln`, `sin`, `cos`, `tan`. Unary minus is lexed as `Minus`.
    Unary(UnaryOp),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,

    Eof,
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Split an expression into tokens.
///
/// Whitespace separates words, and operator or parenthesis characters split
/// them further. A `{...}` pair literal is one token even though it contains
/// a comma and possibly signs, and the sign in an exponent such as `1E-5`
/// stays part of the number.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    Lexer::new(source).tokenize()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<SpannedToken>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<SpannedToken>, ParseError> {
        while let Some(ch) = self.peek() {
            let start = self.pos;
            match ch {
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '+' => self.single(Token::Plus, start),
                '-' => self.single(Token::Minus, start),
                '*' => self.single(Token::Star, start),
                '/' => self.single(Token::Slash, start),
                '^' => self.single(Token::Caret, start),
                '(' => self.single(Token::LParen, start),
                ')' => self.single(Token::RParen, start),
                '{' => self.lex_pair(start)?,
                '}' => {
                    return Err(ParseError::new("Unmatched '}'", Span::new(start, start + 1)));
                }
                _ => self.lex_word(start)?,
            }
        }

        self.tokens.push(SpannedToken {
            token: Token::Eof,
            span: Span::new(self.pos, self.pos),
        });
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos..)?.chars().next()
    }

    fn single(&mut self, token: Token, start: usize) {
        self.pos += 1;
        self.push(token, start);
    }

    fn push(&mut self, token: Token, start: usize) {
        self.tokens.push(SpannedToken {
            token,
            span: Span::new(start, self.pos),
        });
    }

    fn lex_pair(&mut self, start: usize) -> Result<(), ParseError> {
        let rest = self.source.get(start..).unwrap_or_default();
        let Some(close) = rest.find('}') else {
            return Err(ParseError::new(
                "Unterminated '{' in complex literal",
                Span::new(start, self.source.len()),
            ));
        };
        let text = rest.get(..=close).unwrap_or_default();
        self.pos = start + close + 1;
        let value = literal::parse(text).map_err(|e| {
            ParseError::new(e.to_string(), Span::new(start, self.pos))
        })?;
        self.push(Token::Number(value), start);
        Ok(())
    }

    fn lex_word(&mut self, start: usize) -> Result<(), ParseError> {
        while let Some(ch) = self.peek() {
            let word = self.source.get(start..self.pos).unwrap_or_default();
            let ends_word = ch.is_whitespace()
                || matches!(ch, '*' | '/' | '^' | '(' | ')' | '{' | '}')
                || (matches!(ch, '+' | '-') && !is_exponent_prefix(word));
            if ends_word {
                break;
            }
            self.pos += ch.len_utf8();
        }

        let word = self.source.get(start..self.pos).unwrap_or_default();
        let token = if word == VARIABLE_NAME {
            Token::Arg
        } else if let Some(op) = UnaryOp::from_word(word) {
            Token::Unary(op)
        } else if let Ok(value) = literal::parse(word) {
            Token::Number(value)
        } else {
            return Err(ParseError::new(
                format!("Unrecognized token '{word}'"),
                Span::new(start, self.pos),
            ));
        };
        self.push(token, start);
        Ok(())
    }
}

/// True for a decimal mantissa followed by an exponent marker, e.g. `1.5E`.
fn is_exponent_prefix(word: &str) -> bool {
    let Some(mantissa) = word.strip_suffix(['e', 'E']) else {
        return false;
    };
    mantissa.chars().any(|c| c.is_ascii_digit())
        && mantissa.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Vec<Token> {
        lex(s).unwrap().into_iter().map(|t| t.token).collect()
    }

    fn num(re: f64, im: f64) -> Token {
        Token::Number(Complex64::new(re, im))
    }

    #[test]
    fn simple_tokens() {
        assert_eq!(tok("2*z^2"), vec![
            num(2.0, 0.0), Token::Star, Token::Arg, Token::Caret, num(2.0, 0.0), Token::Eof,
        ]);
    }

    #[test]
    fn whitespace_is_insignificant_between_tokens() {
        assert_eq!(tok("  z +\t1 "), tok("z+1"));
    }

    #[test]
    fn unary_words() {
        assert_eq!(tok("ln z"), vec![Token::Unary(UnaryOp::Ln), Token::Arg, Token::Eof]);
        assert_eq!(tok("sin(z)"), vec![
            Token::Unary(UnaryOp::Sin), Token::LParen, Token::Arg, Token::RParen, Token::Eof,
        ]);
    }

    #[test]
    fn pair_literal_is_atomic() {
        assert_eq!(tok("z*{3,-0.5i}"), vec![
            Token::Arg, Token::Star, num(3.0, -0.5), Token::Eof,
        ]);
        assert_eq!(tok("{ 1, 2i }"), vec![num(1.0, 2.0), Token::Eof]);
    }

    #[test]
    fn exponent_sign_stays_in_number() {
        assert_eq!(tok("z+1E-5"), vec![Token::Arg, Token::Plus, num(1e-5, 0.0), Token::Eof]);
        assert_eq!(tok("2.5e+3i"), vec![num(0.0, 2500.0), Token::Eof]);
    }

    #[test]
    fn minus_after_word_is_an_operator() {
        assert_eq!(tok("z-1"), vec![Token::Arg, Token::Minus, num(1.0, 0.0), Token::Eof]);
        assert_eq!(tok("-i"), vec![Token::Minus, num(0.0, 1.0), Token::Eof]);
    }

    #[test]
    fn spans_cover_source() {
        let tokens = lex("ln (z)").unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| (t.span.start, t.span.end)).collect();
        assert_eq!(spans, vec![(0, 2), (3, 4), (4, 5), (5, 6), (6, 6)]);
    }

    #[test]
    fn unknown_word_fails() {
        let err = lex("z + w").unwrap_err();
        assert_eq!(err.span, Span::new(4, 5));
        assert!(lex("2z").is_err());
        assert!(lex("log z").is_err());
    }

    #[test]
    fn broken_pair_fails() {
        assert!(lex("{1,2i").is_err());
        assert!(lex("1}").is_err());
        assert!(lex("{1,2}").is_err());
    }
}
