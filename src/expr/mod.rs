//! Expression language over the complex variable `z`.
//!
//! source → lex → parse → [`Operand`]. Operands that depend on `z` become a
//! [`Function`]; everything else is folded to a constant while parsing.

pub mod error;
pub mod lexer;
pub mod literal;
pub mod ops;
pub mod parser;

use error::{ParseError, Span};
pub use parser::Operand;

use crate::model::Function;

/// Parse an expression into an operand. A constant expression is returned
/// folded, as `Operand::Constant`.
pub fn parse_operand(source: &str) -> Result<Operand, ParseError> {
    let tokens = lexer::lex(source)?;
    parser::parse(tokens)
}

/// Parse an expression that must depend on `z`.
pub fn parse_function(source: &str) -> Result<Function, ParseError> {
    match parse_operand(source)? {
        Operand::Mapped(f) => {
            log::debug!("parsed {source:?} as {}", f.name());
            Ok(f)
        }
        Operand::Constant(c) => Err(ParseError::new(
            format!(
                "expression does not use the argument '{}' (it is the constant {})",
                crate::model::function::VARIABLE_NAME,
                literal::format(c)
            ),
            Span::new(0, source.len()),
        )),
    }
}
