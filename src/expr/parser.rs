use num_complex::Complex64;

use super::error::{ParseError, Span};
use super::lexer::{SpannedToken, Token};
use super::literal;
use super::ops::{BinaryOp, UnaryOp};
use crate::model::{Function, FunctionName};

/// What a sub-expression evaluates to while parsing: a constant folded on the
/// spot, or a function of the argument.
#[derive(Debug, Clone)]
pub enum Operand {
    Constant(Complex64),
    Mapped(Function),
}

/// Parse a token stream into a single operand. The whole stream must be
/// consumed; nothing partial is ever returned.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Operand, ParseError> {
    let mut parser = Parser::new(tokens);
    let operand = parser.parse_expression()?;
    if !parser.at_eof() {
        return Err(ParseError::new(
            format!("Unexpected {} after complete expression", describe(parser.peek())),
            parser.span(),
        ));
    }
    Ok(operand)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |t| &t.token)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map_or(Span::new(0, 0), |t| t.span)
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    fn advance(&mut self) -> Span {
        let span = self.span();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Whether the next token can begin an operand.
    fn starts_operand(&self) -> bool {
        matches!(
            self.peek(),
            Token::Arg | Token::Number(_) | Token::LParen | Token::Unary(_) | Token::Minus
        )
    }

    fn expect_operand(&self, after: &str, op_span: Span) -> Result<(), ParseError> {
        if self.starts_operand() {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("Expected operand after '{after}', got {}", describe(self.peek())),
                op_span.merge(self.span()),
            ))
        }
    }

    // ── Grammar ────────────────────────────────────────────────────

    /// `Term (('+' | '-') Term)*`
    fn parse_expression(&mut self) -> Result<Operand, ParseError> {
        let mut acc = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(acc),
            };
            let op_span = self.advance();
            self.expect_operand(op.symbol(), op_span)?;
            let right = self.parse_term()?;
            acc = binary(acc, op, right);
        }
    }

    /// `Factor (('*' | '/') Factor)*`
    fn parse_term(&mut self) -> Result<Operand, ParseError> {
        let mut acc = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok(acc),
            };
            let op_span = self.advance();
            self.expect_operand(op.symbol(), op_span)?;
            let right = self.parse_factor()?;
            acc = binary(acc, op, right);
        }
    }

    /// `FactorPart ('^' FactorPart)*`, folded left to right.
    fn parse_factor(&mut self) -> Result<Operand, ParseError> {
        let mut acc = self.parse_factor_part()?;
        while matches!(self.peek(), Token::Caret) {
            let op_span = self.advance();
            self.expect_operand(BinaryOp::Pow.symbol(), op_span)?;
            let right = self.parse_factor_part()?;
            acc = binary(acc, BinaryOp::Pow, right);
        }
        Ok(acc)
    }

    /// `[unary] Atom`. The unary operator applies to the atom alone, so
    /// `ln z^2` is `(ln z)^2`.
    fn parse_factor_part(&mut self) -> Result<Operand, ParseError> {
        let op = match self.peek() {
            Token::Unary(op) => *op,
            Token::Minus => UnaryOp::Neg,
            _ => return self.parse_atom(),
        };
        let op_span = self.advance();
        self.expect_operand(op.symbol(), op_span)?;
        let operand = self.parse_atom()?;
        Ok(unary(op, operand))
    }

    /// `'z' | literal | '(' Expression ')' | FactorPart`
    fn parse_atom(&mut self) -> Result<Operand, ParseError> {
        match self.peek().clone() {
            Token::Arg => {
                self.advance();
                Ok(Operand::Mapped(Function::identity()))
            }
            Token::Number(c) => {
                self.advance();
                Ok(Operand::Constant(c))
            }
            Token::LParen => {
                let open = self.advance();
                if matches!(self.peek(), Token::RParen) {
                    return Err(ParseError::new(
                        "Expected expression in parentheses",
                        open.merge(self.span()),
                    ));
                }
                let inner = self.parse_expression()?;
                if !matches!(self.peek(), Token::RParen) {
                    return Err(ParseError::new(
                        format!("Expected closing parenthesis, got {}", describe(self.peek())),
                        open.merge(self.span()),
                    ));
                }
                self.advance();
                Ok(inner)
            }
            // Unary chains: `sin exp z`, `- -z`.
            Token::Unary(_) | Token::Minus => self.parse_factor_part(),
            other => Err(ParseError::new(
                format!("Expected operand, got {}", describe(&other)),
                self.span(),
            )),
        }
    }
}

/// Combine two operands with an infix operator.
fn binary(left: Operand, op: BinaryOp, right: Operand) -> Operand {
    let symbol = op.symbol();
    let operation = op.operation();
    match (left, right) {
        (Operand::Mapped(f), Operand::Mapped(g)) => Operand::Mapped(f.combine(symbol, operation, &g)),
        (Operand::Mapped(f), Operand::Constant(c)) => {
            let name = FunctionName::wrap("(", &format!("{symbol}{})", literal::format(c)));
            Operand::Mapped(f.right_compose(&name, move |w| operation(w, c)))
        }
        (Operand::Constant(c), Operand::Mapped(f)) => {
            let name = FunctionName::wrap(&format!("({}{symbol}", literal::format(c)), ")");
            Operand::Mapped(f.right_compose(&name, move |w| operation(c, w)))
        }
        (Operand::Constant(a), Operand::Constant(b)) => Operand::Constant(operation(a, b)),
    }
}

fn unary(op: UnaryOp, operand: Operand) -> Operand {
    match operand {
        Operand::Mapped(f) => Operand::Mapped(f.right_compose(&op.name(), op.operation())),
        Operand::Constant(c) => Operand::Constant(op.apply(c)),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Arg => "argument 'z'".to_string(),
        Token::Number(c) => format!("number {}", literal::format(*c)),
        Token::Unary(op) => format!("'{}'", op.symbol()),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Caret => "'^'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}
